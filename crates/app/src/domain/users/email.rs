//! Accepted signup email domains.

/// Consumer and regional mail providers customers may sign up with.
const ACCEPTED_DOMAINS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "hotmail.com",
    "hotmail.es",
    "hotmail.co.uk",
    "hotmail.fr",
    "outlook.com",
    "outlook.es",
    "outlook.co.uk",
    "live.com",
    "live.es",
    "msn.com",
    "yahoo.com",
    "yahoo.es",
    "yahoo.co.uk",
    "yahoo.fr",
    "yahoo.com.mx",
    "icloud.com",
    "me.com",
    "mac.com",
    "protonmail.com",
    "proton.me",
    "tutanota.com",
    "tutanota.de",
    "aol.com",
    "zoho.com",
    "mail.com",
    "yandex.com",
    "yandex.ru",
    "gmx.com",
    "gmx.net",
    "gmx.de",
    "igtf.com",
    "fastmail.com",
    "hey.com",
    "bol.com.br",
    "terra.com.br",
    "uol.com.br",
    "telmex.net",
    "une.net.co",
    "claro.com.co",
];

/// Educational and government suffixes accepted regardless of provider.
const ACCEPTED_SUFFIXES: &[&str] = &[".edu", ".gov", ".edu.ve", ".edu.co", ".edu.mx"];

/// Whether `email` looks like `local@domain.tld` and its domain is one customers may use.
#[must_use]
pub fn is_accepted_email(email: &str) -> bool {
    let email = email.trim();

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }

    let domain = domain.to_ascii_lowercase();

    ACCEPTED_SUFFIXES
        .iter()
        .any(|suffix| domain.ends_with(suffix))
        || ACCEPTED_DOMAINS.contains(&domain.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_providers_are_accepted_ignoring_case() {
        assert!(is_accepted_email("lifter@gmail.com"));
        assert!(is_accepted_email("Lifter@Outlook.COM"));
        assert!(is_accepted_email("  lifter@proton.me "));
    }

    #[test]
    fn institutional_suffixes_are_accepted() {
        assert!(is_accepted_email("coach@state.edu"));
        assert!(is_accepted_email("clerk@agency.gov"));
        assert!(is_accepted_email("alumno@unal.edu.co"));
    }

    #[test]
    fn unknown_domains_are_rejected() {
        assert!(!is_accepted_email("lifter@example.com"));
        assert!(!is_accepted_email("lifter@gmail.com.evil.io"));
        assert!(!is_accepted_email("lifter@mailinator.com"));
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        assert!(!is_accepted_email("gmail.com"));
        assert!(!is_accepted_email("@gmail.com"));
        assert!(!is_accepted_email("a@b@gmail.com"));
        assert!(!is_accepted_email("lifter name@gmail.com"));
        assert!(!is_accepted_email(""));
    }
}
