//! Domain-name helpers shared by the driver and the daemon

/// Derive the registrable root (zone name) from an FQDN.
///
/// For "sub.example.com" this is "example.com". Short second-level labels
/// are treated as part of the public suffix, so "deep.example.co.uk"
/// yields "example.co.uk" (not perfect, but works for most cases).
pub fn registrable_root(domain: &str) -> crate::Result<String> {
    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(crate::Error::config(format!(
            "invalid domain name: {}",
            domain
        )));
    }

    let root = if parts.len() >= 3 && parts[parts.len() - 2].len() <= 3 {
        // Handle TLDs like .co.uk, .com.au
        format!(
            "{}.{}.{}",
            parts[parts.len() - 3],
            parts[parts.len() - 2],
            parts[parts.len() - 1]
        )
    } else {
        format!("{}.{}", parts[parts.len() - 2], parts[parts.len() - 1])
    };

    Ok(root)
}
