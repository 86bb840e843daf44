//! Role-based dashboard routing

use crate::config::AuthConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Director,
    Admin,
    /// Any other label, including none at all
    Other,
}

impl Role {
    pub fn parse(label: Option<&str>) -> Self {
        match label.map(str::to_lowercase).as_deref() {
            Some("director") => Role::Director,
            Some("admin") => Role::Admin,
            _ => Role::Other,
        }
    }
}

/// Dashboard page for a cached role label
pub fn dashboard_destination<'a>(role: Option<&str>, config: &'a AuthConfig) -> &'a str {
    match Role::parse(role) {
        Role::Director => &config.director_dashboard,
        Role::Admin => &config.admin_dashboard,
        Role::Other => &config.default_dashboard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Role::parse(Some("Director")), Role::Director);
        assert_eq!(Role::parse(Some("ADMIN")), Role::Admin);
        assert_eq!(Role::parse(Some("technician")), Role::Other);
        assert_eq!(Role::parse(Some("")), Role::Other);
        assert_eq!(Role::parse(None), Role::Other);
    }

    #[test]
    fn test_destinations() {
        let config = AuthConfig::default();
        assert_eq!(dashboard_destination(Some("director"), &config), "director-dashboard.html");
        assert_eq!(dashboard_destination(Some("Admin"), &config), "admin-dashboard.html");
        assert_eq!(dashboard_destination(Some("User"), &config), "all-requests-d.html");
        assert_eq!(dashboard_destination(None, &config), "all-requests-d.html");
    }
}
