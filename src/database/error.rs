use crate::modules::common::responses::{internal_error_res, SimpleError};
use convert_case::{Case, Casing};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use http::StatusCode;

/// Wrapper for diesel errors.
///
/// This is useful for wrapping database errors and safely returning them from
/// axum route handlers without worrying about leaking sensitive information.
pub struct DbError(DieselError);

impl From<DieselError> for DbError {
    fn from(err: DieselError) -> Self {
        DbError(err)
    }
}

impl From<DbError> for (StatusCode, SimpleError) {
    fn from(err: DbError) -> Self {
        match err.0 {
            DieselError::DatabaseError(db_err, info) => {
                if let DatabaseErrorKind::UniqueViolation = db_err {
                    if let Some(column_name) = get_column_name_from_db_error_info(info.as_ref()) {
                        let snake_cased_col_name = column_name.to_case(Case::ScreamingSnake);

                        let error_msg = format!("{}_IN_USE", snake_cased_col_name);

                        return (StatusCode::BAD_REQUEST, SimpleError::from(error_msg));
                    }
                }

                internal_error_res()
            }

            DieselError::NotFound => (StatusCode::NOT_FOUND, SimpleError::from("entity not found")),

            _ => internal_error_res(),
        }
    }
}

/// Extracts the column name from the name of a database unique constraint.
/// assuming the naming pattern: `<table_name>_<column>_unique`.
///
/// the table name must be stripped as a prefix rather than splitting on
/// underscores, otherwise multi word columns such as `stock_number` lose
/// every segment but the last. when the error carries no table name the
/// last segment is returned as a fallback.
///
/// returns `Some(<column>)` if the pattern is ok otherwise `None`.
fn get_column_name_from_unique_constraint_name<'a>(
    unique_constraint_name: &'a str,
    table_name: Option<&str>,
) -> Option<&'a str> {
    let non_suffixed_constraint_name = unique_constraint_name.strip_suffix("_unique")?;

    if let Some(table_name) = table_name {
        let column_name = non_suffixed_constraint_name
            .strip_prefix(table_name)
            .and_then(|rest| rest.strip_prefix('_'));

        if let Some(column_name) = column_name.filter(|c| !c.is_empty()) {
            return Some(column_name);
        }
    }

    non_suffixed_constraint_name.split('_').last()
}

/// Returns the column name from the database error information
///
/// - if the error contains the column name, returns it.
///
/// - if the error is from a unique constraint, returns the column name
/// inside the unique constraint.
///
/// otherwise returns `None`
fn get_column_name_from_db_error_info(info: &dyn DatabaseErrorInformation) -> Option<&str> {
    let err_col_name = info.column_name();

    if err_col_name.is_some() {
        return err_col_name;
    }

    if let Some(constraint_name) = info.constraint_name() {
        return get_column_name_from_unique_constraint_name(constraint_name, info.table_name());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_column_from_unique_constraint_name() {
        assert_eq!(
            get_column_name_from_unique_constraint_name("vehicle_vin_unique", Some("vehicle")),
            Some("vin")
        );
        assert_eq!(
            get_column_name_from_unique_constraint_name(
                "app_user_username_unique",
                Some("app_user")
            ),
            Some("username")
        );
    }

    #[test]
    fn extracts_multi_word_columns() {
        assert_eq!(
            get_column_name_from_unique_constraint_name(
                "vehicle_stock_number_unique",
                Some("vehicle")
            ),
            Some("stock_number")
        );
        assert_eq!(
            get_column_name_from_unique_constraint_name(
                "dealership_custom_domain_unique",
                Some("dealership")
            ),
            Some("custom_domain")
        );
    }

    #[test]
    fn falls_back_to_the_last_segment_without_a_table_name() {
        assert_eq!(
            get_column_name_from_unique_constraint_name("vehicle_vin_unique", None),
            Some("vin")
        );
        // the fallback cannot recover multi word columns
        assert_eq!(
            get_column_name_from_unique_constraint_name("vehicle_stock_number_unique", None),
            Some("number")
        );
    }

    #[test]
    fn ignores_constraints_without_the_unique_suffix() {
        assert_eq!(
            get_column_name_from_unique_constraint_name("vehicle_pkey", Some("vehicle")),
            None
        );
        assert_eq!(
            get_column_name_from_unique_constraint_name("session_user_id_fkey", Some("session")),
            None
        );
    }
}
