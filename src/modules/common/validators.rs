use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// lowercase url friendly identifier, eg: "trex-auto-sales"
    pub static ref REGEX_IS_SLUG: Regex = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
    //
    pub static ref REGEX_IS_HEX_COLOR: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
    //
    /// 17 char VIN, letters I, O and Q are not valid VIN characters
    pub static ref REGEX_IS_VIN: Regex = Regex::new(r"^[A-HJ-NPR-Za-hj-npr-z0-9]{11,17}$").unwrap();
    //
    pub static ref REGEX_IS_ISO_DATE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    //
    /// non negative decimal string with up to two fractional digits, eg: "18999.00"
    pub static ref REGEX_IS_DECIMAL: Regex = Regex::new(r"^\d+(\.\d{1,2})?$").unwrap();
}

/// validates a vehicle status string, one of: `available`, `pending`, `sold`
pub fn is_vehicle_status(status: &str) -> Result<(), ValidationError> {
    use std::str::FromStr;

    crate::modules::vehicle::dto::VehicleStatus::from_str(status)
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid vehicle status"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_regex() {
        assert!(REGEX_IS_SLUG.is_match("trex-auto-sales"));
        assert!(REGEX_IS_SLUG.is_match("a1"));
        assert!(!REGEX_IS_SLUG.is_match("Trex"));
        assert!(!REGEX_IS_SLUG.is_match("-leading"));
        assert!(!REGEX_IS_SLUG.is_match("trailing-"));
        assert!(!REGEX_IS_SLUG.is_match("with space"));
    }

    #[test]
    fn vin_regex() {
        assert!(REGEX_IS_VIN.is_match("1HGBH41JXMN109186"));
        // I, O and Q are not valid VIN characters
        assert!(!REGEX_IS_VIN.is_match("1HGBH41IXMN109186"));
        assert!(!REGEX_IS_VIN.is_match("too-short"));
    }

    #[test]
    fn decimal_regex() {
        assert!(REGEX_IS_DECIMAL.is_match("18999.00"));
        assert!(REGEX_IS_DECIMAL.is_match("0"));
        assert!(REGEX_IS_DECIMAL.is_match("12000.5"));
        assert!(!REGEX_IS_DECIMAL.is_match("-100"));
        assert!(!REGEX_IS_DECIMAL.is_match("12.345"));
        assert!(!REGEX_IS_DECIMAL.is_match("1,200"));
    }

    #[test]
    fn vehicle_status_validator() {
        assert!(is_vehicle_status("available").is_ok());
        assert!(is_vehicle_status("pending").is_ok());
        assert!(is_vehicle_status("sold").is_ok());
        assert!(is_vehicle_status("parked").is_err());
    }
}
