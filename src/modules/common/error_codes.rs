/// a request to a endpoint was not authorized because it did not contain
/// the session id cookie in the request headers
pub static NO_SID_COOKIE: &str = "NO_SID_COOKIE";

/// a request to a endpoint was not authorized because
/// the session on the session id cookie is expired or does not exist
pub static INVALID_SESSION: &str = "INVALID_SESSION";

/// a state changing request did not carry the x-csrf-token header
pub static NO_CSRF_TOKEN: &str = "NO_CSRF_TOKEN";

/// the x-csrf-token header did not match the token stored on the session
pub static INVALID_CSRF_TOKEN: &str = "INVALID_CSRF_TOKEN";

/// a admin operation was attempted without a dealership selected
/// on the session
pub static NO_DEALERSHIP_SELECTED: &str = "NO_DEALERSHIP_SELECTED";

/// the target entity belongs to a dealership other than the one
/// selected on the session
pub static DEALERSHIP_ACCESS_DENIED: &str = "DEALERSHIP_ACCESS_DENIED";

/// the dealership selected on the session was soft disabled
pub static DEALERSHIP_DISABLED: &str = "DEALERSHIP_DISABLED";

/// invalid username / password pair on a login attempt
pub static INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
