//! Email address utilities

/// Mask an email address for display in logs (e.g., j***@example.com)
///
/// Keeps the first character of the local part and the full domain. Inputs
/// without an `@` are masked entirely.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        Some((_, domain)) => format!("***@{}", domain),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("jane.doe@school.org"), "j***@school.org");
        assert_eq!(mask_email("a@b.com"), "a***@b.com");
    }

    #[test]
    fn test_mask_email_malformed() {
        assert_eq!(mask_email("not-an-email"), "***");
        assert_eq!(mask_email("@school.org"), "***@school.org");
        assert_eq!(mask_email(""), "***");
    }

    #[test]
    fn test_mask_email_multibyte_local_part() {
        assert_eq!(mask_email("élodie@école.fr"), "é***@école.fr");
    }
}
