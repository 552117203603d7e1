//! Best-effort column lookup for exports whose header names drift.

use crate::normalize::normalize;

/// Normalized fragments identifying the "responsible user" column.
pub const RESPONSIBLE_USER_FRAGMENTS: &[&str] = &["responsavel", "responsible"];

/// Normalized fragments identifying the lead origin column
/// (`Fonte`, `Origem`, `Source`, ...).
pub const SOURCE_FRAGMENTS: &[&str] = &["source", "origin", "origem", "font"];

/// Normalized fragments identifying the client name column.
pub const CLIENT_NAME_FRAGMENTS: &[&str] = &["client"];

/// Returns the first header, in iteration (column) order, whose normalized
/// form contains any of `fragments`.
///
/// `fragments` must already be in normalized form.
pub fn resolve_header<'a, I>(headers: I, fragments: &[&str]) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    headers.into_iter().find(|header| {
        let normalized = normalize(header);
        fragments.iter().any(|fragment| normalized.contains(fragment))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_accented_header() {
        let headers = ["Título", "Usuário responsável atual", "Fonte"];
        assert_eq!(
            resolve_header(headers, RESPONSIBLE_USER_FRAGMENTS),
            Some("Usuário responsável atual")
        );
        assert_eq!(resolve_header(headers, SOURCE_FRAGMENTS), Some("Fonte"));
    }

    #[test]
    fn first_match_in_column_order_wins() {
        let headers = ["Origem do lead", "Lead Source"];
        assert_eq!(
            resolve_header(headers, SOURCE_FRAGMENTS),
            Some("Origem do lead")
        );
    }

    #[test]
    fn matching_ignores_case_and_spacing() {
        let headers = ["LEAD   SOURCE"];
        assert_eq!(resolve_header(headers, SOURCE_FRAGMENTS), Some("LEAD   SOURCE"));
    }

    #[test]
    fn no_match_is_none() {
        let headers = ["Título", "Status"];
        assert_eq!(resolve_header(headers, CLIENT_NAME_FRAGMENTS), None);
    }

    #[test]
    fn client_fragment_matches_portuguese_header() {
        let headers = ["Nome do cliente"];
        assert_eq!(
            resolve_header(headers, CLIENT_NAME_FRAGMENTS),
            Some("Nome do cliente")
        );
    }
}
