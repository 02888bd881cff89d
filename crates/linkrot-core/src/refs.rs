//! Reference sorting: raw extracted references become result items with
//! exactly one populated bucket.

use serde::{Deserialize, Serialize};

use crate::result::ResultItem;

/// The four reference kinds, in fixed display priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Pdf,
    Doi,
    Arxiv,
    Url,
}

impl RefKind {
    /// Section heading used when grouping rendered rows.
    pub fn section(self) -> &'static str {
        match self {
            Self::Pdf => "pdfs",
            Self::Doi => "doi",
            Self::Arxiv => "arxiv",
            Self::Url => "urls",
        }
    }
}

/// A reference as extracted upstream: its kind plus the raw identifier
/// (a URL for `pdf`/`url`, a bare id for `doi`/`arxiv`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub kind: RefKind,
    pub raw: String,
}

/// Trim and prepend `http://` when no scheme is present.
pub fn sanitize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

/// Sort one reference into a result item.
///
/// arXiv ids and DOIs are expanded to their canonical resolver URLs. Plain
/// URLs pointing at doi.org or arxiv.org are re-bucketed into the matching
/// kind. Exactly one bucket of the returned item is non-empty.
pub fn sort_reference(reference: &Reference) -> ResultItem {
    let mut item = ResultItem::default();
    match reference.kind {
        RefKind::Arxiv => {
            let url = sanitize_url(&format!("http://arxiv.org/abs/{}", reference.raw.trim()));
            item.arxiv.push(url);
        }
        RefKind::Doi => {
            let url = sanitize_url(&format!("http://doi.org/{}", reference.raw.trim()));
            item.doi.push(url);
        }
        RefKind::Pdf => {
            item.pdfs.push(sanitize_url(&reference.raw));
        }
        RefKind::Url => {
            let url = sanitize_url(&reference.raw);
            match host_of(&url) {
                Some(host) if host.ends_with("doi.org") => item.doi.push(url),
                Some(host) if host.ends_with("arxiv.org") => item.arxiv.push(url),
                _ => item.urls.push(url),
            }
        }
    }
    item
}

fn host_of(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_buckets(item: &ResultItem) -> usize {
        [&item.pdfs, &item.doi, &item.arxiv, &item.urls]
            .iter()
            .filter(|bucket| !bucket.is_empty())
            .count()
    }

    #[test]
    fn sanitize_adds_scheme() {
        assert_eq!(sanitize_url("example.com/x"), "http://example.com/x");
        assert_eq!(sanitize_url("  example.com "), "http://example.com");
    }

    #[test]
    fn sanitize_keeps_existing_scheme() {
        assert_eq!(sanitize_url("https://example.com"), "https://example.com");
        assert_eq!(sanitize_url("http://example.com"), "http://example.com");
    }

    #[test]
    fn arxiv_id_becomes_abs_url() {
        let item = sort_reference(&Reference {
            kind: RefKind::Arxiv,
            raw: "1706.03762".into(),
        });
        assert_eq!(item.arxiv, vec!["http://arxiv.org/abs/1706.03762"]);
        assert_eq!(populated_buckets(&item), 1);
    }

    #[test]
    fn doi_becomes_resolver_url() {
        let item = sort_reference(&Reference {
            kind: RefKind::Doi,
            raw: "10.1000/xyz123".into(),
        });
        assert_eq!(item.doi, vec!["http://doi.org/10.1000/xyz123"]);
        assert_eq!(populated_buckets(&item), 1);
    }

    #[test]
    fn pdf_goes_to_pdfs() {
        let item = sort_reference(&Reference {
            kind: RefKind::Pdf,
            raw: "example.com/paper.pdf".into(),
        });
        assert_eq!(item.pdfs, vec!["http://example.com/paper.pdf"]);
    }

    #[test]
    fn url_on_doi_host_is_rebucketed() {
        let item = sort_reference(&Reference {
            kind: RefKind::Url,
            raw: "https://doi.org/10.1/x".into(),
        });
        assert_eq!(item.doi, vec!["https://doi.org/10.1/x"]);
        assert!(item.urls.is_empty());
    }

    #[test]
    fn url_on_arxiv_host_is_rebucketed() {
        let item = sort_reference(&Reference {
            kind: RefKind::Url,
            raw: "https://www.arxiv.org/abs/1706.03762".into(),
        });
        assert_eq!(item.arxiv, vec!["https://www.arxiv.org/abs/1706.03762"]);
    }

    #[test]
    fn ordinary_url_stays_a_url() {
        let item = sort_reference(&Reference {
            kind: RefKind::Url,
            raw: "https://example.com/page".into(),
        });
        assert_eq!(item.urls, vec!["https://example.com/page"]);
        assert_eq!(populated_buckets(&item), 1);
    }
}
