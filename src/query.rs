//! Censys search query construction.

/// Domain CloudFlare reissues edge certificates under. Every CloudFlare-fronted
/// site shares these, so they never point at an origin.
pub const CDN_REISSUE_DOMAIN: &str = "cloudflaressl.com";

/// Certificates naming `domain` with a valid signature, excluding CDN reissues
pub fn certificate_query(domain: &str) -> String {
    format!(
        "names: {} and parsed.signature.valid: true and not names: {}",
        domain, CDN_REISSUE_DOMAIN
    )
}

/// Hosts presenting a leaf certificate with any of `fingerprints`
pub fn host_query<I, S>(fingerprints: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let list: Vec<String> = fingerprints
        .into_iter()
        .map(|fp| fp.as_ref().to_string())
        .collect();
    format!(
        "services.tls.certificates.leaf_data.fingerprint: {{{}}}",
        list.join(",")
    )
}
