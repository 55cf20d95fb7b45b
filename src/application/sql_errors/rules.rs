//! Static rule table: vendor error code -> HTTP status + message generator

use axum::http::StatusCode;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::extract;
use crate::config::Locale;
use crate::domain::{DbErrorReport, POOL_TIMEOUT};

/// Family of known database conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlErrorCategory {
    UniqueViolation,
    ValueTooLong,
    NullViolation,
    MissingDefault,
    MissingReference,
    RowReferenced,
    InvalidValue,
    InvalidFormat,
    MalformedQuery,
    Deadlock,
    LockTimeout,
    OutOfRange,
    ConnectionRefused,
    ConnectionLost,
    ConnectionTimeout,
    TooManyConnections,
    PoolExhausted,
}

impl SqlErrorCategory {
    /// The caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SqlErrorCategory::Deadlock
                | SqlErrorCategory::LockTimeout
                | SqlErrorCategory::ConnectionRefused
                | SqlErrorCategory::ConnectionLost
                | SqlErrorCategory::ConnectionTimeout
                | SqlErrorCategory::TooManyConnections
                | SqlErrorCategory::PoolExhausted
        )
    }
}

type MessageFn = fn(&DbErrorReport, Locale) -> String;

/// One entry of the rule table
#[derive(Clone, Copy)]
pub struct SqlErrorRule {
    pub code: &'static str,
    pub status: StatusCode,
    pub category: SqlErrorCategory,
    message: MessageFn,
}

impl std::fmt::Debug for SqlErrorRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlErrorRule")
            .field("code", &self.code)
            .field("status", &self.status)
            .field("category", &self.category)
            .finish()
    }
}

impl SqlErrorRule {
    /// Produce the user-facing message. Never fails: missing names become
    /// placeholders.
    pub fn message_for(&self, error: &DbErrorReport, locale: Locale) -> String {
        (self.message)(error, locale)
    }
}

fn unknown(locale: Locale) -> &'static str {
    match locale {
        Locale::Fr => "inconnu",
        Locale::En => "unknown",
    }
}

const UNKNOWN_VALUE: &str = "?";

fn duplicate_entry(err: &DbErrorReport, locale: Locale) -> String {
    let field = extract::duplicate_key(err.diagnostic()).unwrap_or(unknown(locale));
    let value = extract::duplicate_value(err.diagnostic()).unwrap_or(UNKNOWN_VALUE);
    match locale {
        Locale::Fr => format!(
            "Doublon détecté : la valeur \"{}\" existe déjà pour le champ \"{}\". Veuillez utiliser une valeur différente.",
            value, field
        ),
        Locale::En => format!(
            "Duplicate value: \"{}\" already exists for field \"{}\". Please use a different value.",
            value, field
        ),
    }
}

fn data_too_long(err: &DbErrorReport, locale: Locale) -> String {
    let field = extract::column(err.diagnostic()).unwrap_or(unknown(locale));
    match locale {
        Locale::Fr => format!(
            "La valeur du champ \"{}\" dépasse la taille maximale autorisée. Veuillez raccourcir le texte.",
            field
        ),
        Locale::En => format!(
            "The value of field \"{}\" exceeds the maximum allowed length. Please shorten the text.",
            field
        ),
    }
}

fn bad_null(err: &DbErrorReport, locale: Locale) -> String {
    let field = extract::null_column(err.diagnostic()).unwrap_or(unknown(locale));
    match locale {
        Locale::Fr => format!(
            "Le champ \"{}\" est obligatoire et ne peut pas être vide.",
            field
        ),
        Locale::En => format!("Field \"{}\" is required and cannot be empty.", field),
    }
}

fn no_default(err: &DbErrorReport, locale: Locale) -> String {
    let field = extract::field(err.diagnostic()).unwrap_or(unknown(locale));
    match locale {
        Locale::Fr => format!(
            "Le champ \"{}\" est obligatoire et doit être renseigné.",
            field
        ),
        Locale::En => format!("Field \"{}\" is required and must be provided.", field),
    }
}

fn missing_reference(err: &DbErrorReport, locale: Locale) -> String {
    let field = extract::foreign_key(err.diagnostic()).unwrap_or(unknown(locale));
    match locale {
        Locale::Fr => format!(
            "Référence invalide : l'élément lié au champ \"{}\" n'existe pas. Vérifiez que la ressource référencée existe.",
            field
        ),
        Locale::En => format!(
            "Invalid reference: the item linked to field \"{}\" does not exist. Check that the referenced resource exists.",
            field
        ),
    }
}

fn row_referenced(err: &DbErrorReport, locale: Locale) -> String {
    let constraint = extract::constraint(err.diagnostic());
    match locale {
        Locale::Fr => format!(
            "Suppression impossible : cet élément est utilisé par d'autres données{}. Supprimez d'abord les éléments liés.",
            constraint
                .map(|c| format!(" (contrainte: {})", c))
                .unwrap_or_default()
        ),
        Locale::En => format!(
            "Cannot delete: this item is referenced by other data{}. Delete the related items first.",
            constraint
                .map(|c| format!(" (constraint: {})", c))
                .unwrap_or_default()
        ),
    }
}

fn wrong_value_for_field(err: &DbErrorReport, locale: Locale) -> String {
    let field = extract::column(err.diagnostic()).unwrap_or(unknown(locale));
    let value = extract::wrong_value(err.diagnostic()).unwrap_or(UNKNOWN_VALUE);
    match locale {
        Locale::Fr => format!(
            "Valeur invalide \"{}\" pour le champ \"{}\". Vérifiez le format attendu (nombre, date, etc.).",
            value, field
        ),
        Locale::En => format!(
            "Invalid value \"{}\" for field \"{}\". Check the expected format (number, date, etc.).",
            value, field
        ),
    }
}

fn wrong_value(_: &DbErrorReport, locale: Locale) -> String {
    match locale {
        Locale::Fr => "Format de donnée invalide. Vérifiez que les valeurs sont dans le bon format (nombre, date, etc.).".to_string(),
        Locale::En => "Invalid data format. Check that values use the expected format (number, date, etc.).".to_string(),
    }
}

fn parse_error(_: &DbErrorReport, locale: Locale) -> String {
    match locale {
        Locale::Fr => "Erreur interne de requête SQL. Contactez l'administrateur.".to_string(),
        Locale::En => "Internal SQL query error. Please contact the administrator.".to_string(),
    }
}

fn deadlock(_: &DbErrorReport, locale: Locale) -> String {
    match locale {
        Locale::Fr => "Conflit d'accès simultané à la base de données. Veuillez réessayer dans quelques instants.".to_string(),
        Locale::En => "Concurrent database access conflict. Please retry in a few moments.".to_string(),
    }
}

fn lock_wait_timeout(_: &DbErrorReport, locale: Locale) -> String {
    match locale {
        Locale::Fr => "Délai d'attente dépassé. La base de données est surchargée. Veuillez réessayer.".to_string(),
        Locale::En => "Wait timeout exceeded. The database is busy. Please retry.".to_string(),
    }
}

fn out_of_range(err: &DbErrorReport, locale: Locale) -> String {
    let field = extract::column(err.diagnostic()).unwrap_or(unknown(locale));
    match locale {
        Locale::Fr => format!(
            "La valeur numérique du champ \"{}\" est hors limites. Vérifiez que le nombre est dans une plage acceptable.",
            field
        ),
        Locale::En => format!(
            "The numeric value of field \"{}\" is out of range. Check that the number is within an acceptable range.",
            field
        ),
    }
}

fn connection_refused(_: &DbErrorReport, locale: Locale) -> String {
    match locale {
        Locale::Fr => "Impossible de se connecter à la base de données. Le service est peut-être indisponible.".to_string(),
        Locale::En => "Unable to connect to the database. The service may be unavailable.".to_string(),
    }
}

fn connection_lost(_: &DbErrorReport, locale: Locale) -> String {
    match locale {
        Locale::Fr => "La connexion à la base de données a été perdue. Veuillez réessayer.".to_string(),
        Locale::En => "The database connection was lost. Please retry.".to_string(),
    }
}

fn connection_timeout(_: &DbErrorReport, locale: Locale) -> String {
    match locale {
        Locale::Fr => "Délai de connexion à la base de données dépassé. Veuillez réessayer.".to_string(),
        Locale::En => "Database connection timed out. Please retry.".to_string(),
    }
}

fn too_many_connections(_: &DbErrorReport, locale: Locale) -> String {
    match locale {
        Locale::Fr => "Trop de connexions simultanées à la base de données. Veuillez réessayer dans quelques instants.".to_string(),
        Locale::En => "Too many concurrent database connections. Please retry in a few moments.".to_string(),
    }
}

fn pool_exhausted(_: &DbErrorReport, locale: Locale) -> String {
    match locale {
        Locale::Fr => "Toutes les connexions à la base de données sont occupées. Veuillez réessayer dans quelques instants.".to_string(),
        Locale::En => "All database connections are busy. Please retry in a few moments.".to_string(),
    }
}

const fn rule(
    code: &'static str,
    status: StatusCode,
    category: SqlErrorCategory,
    message: MessageFn,
) -> SqlErrorRule {
    SqlErrorRule {
        code,
        status,
        category,
        message,
    }
}

/// Every known condition, in table order
pub static SQL_ERROR_RULES: &[SqlErrorRule] = &[
    rule("ER_DUP_ENTRY", StatusCode::CONFLICT, SqlErrorCategory::UniqueViolation, duplicate_entry),
    rule("ER_DATA_TOO_LONG", StatusCode::BAD_REQUEST, SqlErrorCategory::ValueTooLong, data_too_long),
    rule("ER_BAD_NULL_ERROR", StatusCode::BAD_REQUEST, SqlErrorCategory::NullViolation, bad_null),
    rule("ER_NO_DEFAULT_FOR_FIELD", StatusCode::BAD_REQUEST, SqlErrorCategory::MissingDefault, no_default),
    rule("ER_NO_REFERENCED_ROW_2", StatusCode::BAD_REQUEST, SqlErrorCategory::MissingReference, missing_reference),
    rule("ER_NO_REFERENCED_ROW", StatusCode::BAD_REQUEST, SqlErrorCategory::MissingReference, missing_reference),
    rule("ER_ROW_IS_REFERENCED_2", StatusCode::CONFLICT, SqlErrorCategory::RowReferenced, row_referenced),
    rule("ER_ROW_IS_REFERENCED", StatusCode::CONFLICT, SqlErrorCategory::RowReferenced, row_referenced),
    rule("ER_TRUNCATED_WRONG_VALUE_FOR_FIELD", StatusCode::BAD_REQUEST, SqlErrorCategory::InvalidValue, wrong_value_for_field),
    rule("ER_TRUNCATED_WRONG_VALUE", StatusCode::BAD_REQUEST, SqlErrorCategory::InvalidFormat, wrong_value),
    rule("ER_PARSE_ERROR", StatusCode::INTERNAL_SERVER_ERROR, SqlErrorCategory::MalformedQuery, parse_error),
    rule("ER_LOCK_DEADLOCK", StatusCode::SERVICE_UNAVAILABLE, SqlErrorCategory::Deadlock, deadlock),
    rule("ER_LOCK_WAIT_TIMEOUT", StatusCode::SERVICE_UNAVAILABLE, SqlErrorCategory::LockTimeout, lock_wait_timeout),
    rule("ER_WARN_DATA_OUT_OF_RANGE", StatusCode::BAD_REQUEST, SqlErrorCategory::OutOfRange, out_of_range),
    rule("ECONNREFUSED", StatusCode::SERVICE_UNAVAILABLE, SqlErrorCategory::ConnectionRefused, connection_refused),
    rule("PROTOCOL_CONNECTION_LOST", StatusCode::SERVICE_UNAVAILABLE, SqlErrorCategory::ConnectionLost, connection_lost),
    rule("ETIMEDOUT", StatusCode::SERVICE_UNAVAILABLE, SqlErrorCategory::ConnectionTimeout, connection_timeout),
    rule("ER_CON_COUNT_ERROR", StatusCode::SERVICE_UNAVAILABLE, SqlErrorCategory::TooManyConnections, too_many_connections),
    rule(POOL_TIMEOUT, StatusCode::SERVICE_UNAVAILABLE, SqlErrorCategory::PoolExhausted, pool_exhausted),
];

static RULE_INDEX: Lazy<HashMap<&'static str, &'static SqlErrorRule>> =
    Lazy::new(|| SQL_ERROR_RULES.iter().map(|r| (r.code, r)).collect());

/// Look up the rule for a vendor code
pub fn find_rule(code: &str) -> Option<&'static SqlErrorRule> {
    RULE_INDEX.get(code).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = SQL_ERROR_RULES.iter().map(|r| r.code).collect();
        assert_eq!(codes.len(), SQL_ERROR_RULES.len());
    }

    #[test]
    fn test_find_rule() {
        let rule = find_rule("ER_DUP_ENTRY").unwrap();
        assert_eq!(rule.status, StatusCode::CONFLICT);
        assert_eq!(rule.category, SqlErrorCategory::UniqueViolation);

        assert!(find_rule("er_dup_entry").is_none());
        assert!(find_rule("").is_none());
    }

    #[test]
    fn test_retryable_rules_are_503() {
        for rule in SQL_ERROR_RULES {
            assert_eq!(
                rule.category.is_retryable(),
                rule.status == StatusCode::SERVICE_UNAVAILABLE,
                "{}",
                rule.code
            );
        }
    }

    #[test]
    fn test_row_referenced_without_constraint() {
        let rule = find_rule("ER_ROW_IS_REFERENCED_2").unwrap();
        let message = rule.message_for(&DbErrorReport::new("fk"), Locale::Fr);
        assert!(!message.contains("contrainte"));

        let err = DbErrorReport::new("fk").with_diagnostic(
            "Cannot delete or update a parent row: a foreign key constraint fails \
             (`cliiink`.`articles`, CONSTRAINT `fk_articles_partner` FOREIGN KEY (`partner_id`) \
             REFERENCES `partners` (`id`))",
        );
        let message = rule.message_for(&err, Locale::En);
        assert!(message.contains("(constraint: fk_articles_partner)"));
    }

    #[test]
    fn test_placeholders_per_locale() {
        let rule = find_rule("ER_BAD_NULL_ERROR").unwrap();
        let err = DbErrorReport::new("null");
        assert!(rule.message_for(&err, Locale::Fr).contains("\"inconnu\""));
        assert!(rule.message_for(&err, Locale::En).contains("\"unknown\""));
    }
}
