//! Git-derived values
//!
//! Text transforms applied to git output, and version-sort ordering of tags.

use std::cmp::Ordering;

/// Browsable HTTPS URL for a remote
///
/// Strips a trailing `.git` and rewrites SSH remotes:
/// `git@host:group/repo.git` and `ssh://git@host[:port]/group/repo.git`
/// both become `https://host/group/repo`. Other URLs keep their scheme.
pub fn source_url(remote: &str) -> String {
    let url = remote.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    if let Some(rest) = url.strip_prefix("ssh://") {
        let rest = rest.split_once('@').map_or(rest, |(_, host)| host);
        let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
        let host = host.split(':').next().unwrap_or(host);
        return format!("https://{}/{}", host, path);
    }

    if let Some(rest) = url.strip_prefix("git@") {
        return format!("https://{}", rest.replacen(':', "/", 1));
    }

    url.to_string()
}

/// Repository name: the last path component of the remote without `.git`
pub fn project_name(remote: &str) -> String {
    let url = remote.trim().trim_end_matches('/');
    let base = url.rsplit(['/', ':']).next().unwrap_or(url);
    base.strip_suffix(".git").unwrap_or(base).to_string()
}

/// Current branch name, `None` for a detached HEAD
pub fn branch_name(abbrev_ref: &str) -> Option<String> {
    match abbrev_ref.trim() {
        "" | "HEAD" => None,
        name => Some(name.to_string()),
    }
}

/// Highest tag by version order from `git tag --list` output
pub fn latest_tag(listing: &str) -> Option<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .max_by(|a, b| version_cmp(a, b))
        .map(str::to_string)
}

/// Rank of a non-digit byte: end and digits first, then `~` below them,
/// letters, and other punctuation last
fn order(c: Option<u8>) -> i32 {
    match c {
        None => 0,
        Some(c) if c.is_ascii_digit() => 0,
        Some(c) if c.is_ascii_alphabetic() => i32::from(c),
        Some(b'~') => -1,
        Some(c) => i32::from(c) + 256,
    }
}

fn is_digit(s: &[u8], i: usize) -> bool {
    s.get(i).is_some_and(u8::is_ascii_digit)
}

/// Version-sort comparison, the ordering of `sort -V`
///
/// Runs of digits compare numerically and every other run by [`order`], so
/// `v1.10.0 > v1.9.0`, `v2.0.0 > v1.5.0` and `v0.9 > 1.0.0`.
pub fn version_cmp(a: &str, b: &str) -> Ordering {
    let (l, r) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    while i < l.len() || j < r.len() {
        while (i < l.len() && !is_digit(l, i)) || (j < r.len() && !is_digit(r, j)) {
            let ord = order(l.get(i).copied()).cmp(&order(r.get(j).copied()));
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }

        while l.get(i) == Some(&b'0') {
            i += 1;
        }
        while r.get(j) == Some(&b'0') {
            j += 1;
        }

        let mut first_diff = Ordering::Equal;
        while is_digit(l, i) && is_digit(r, j) {
            if first_diff == Ordering::Equal {
                first_diff = l[i].cmp(&r[j]);
            }
            i += 1;
            j += 1;
        }
        if is_digit(l, i) {
            return Ordering::Greater;
        }
        if is_digit(r, j) {
            return Ordering::Less;
        }
        if first_diff != Ordering::Equal {
            return first_diff;
        }
    }

    a.cmp(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_url_scp_style() {
        assert_eq!(
            source_url("git@example.com:group/repo.git"),
            "https://example.com/group/repo"
        );
    }

    #[test]
    fn test_source_url_ssh_scheme() {
        assert_eq!(
            source_url("ssh://git@example.com:2222/group/repo.git"),
            "https://example.com/group/repo"
        );
    }

    #[test]
    fn test_source_url_https_untouched() {
        assert_eq!(
            source_url("https://github.com/group/repo.git\n"),
            "https://github.com/group/repo"
        );
        assert_eq!(
            source_url("https://github.com/group/repo"),
            "https://github.com/group/repo"
        );
    }

    #[test]
    fn test_project_name() {
        assert_eq!(project_name("https://example.com/group/repo.git"), "repo");
        assert_eq!(project_name("git@example.com:group/repo.git"), "repo");
        assert_eq!(project_name("git@example.com:repo.git"), "repo");
        assert_eq!(project_name("/srv/git/repo/"), "repo");
    }

    #[test]
    fn test_branch_name() {
        assert_eq!(branch_name("feature/x\n"), Some("feature/x".to_string()));
        assert_eq!(branch_name("HEAD"), None);
        assert_eq!(branch_name(""), None);
    }

    #[test]
    fn test_latest_tag_version_sorted() {
        assert_eq!(
            latest_tag("v1.0.0\nv2.0.0\nv1.5.0\n"),
            Some("v2.0.0".to_string())
        );
    }

    #[test]
    fn test_latest_tag_numeric_not_lexical() {
        assert_eq!(
            latest_tag("v1.9.0\nv1.10.0\nv1.2.0"),
            Some("v1.10.0".to_string())
        );
    }

    #[test]
    fn test_latest_tag_none() {
        assert_eq!(latest_tag(""), None);
        assert_eq!(latest_tag("\n  \n"), None);
    }

    #[test]
    fn test_version_cmp_ordering() {
        assert_eq!(version_cmp("v0.0.0", "v0.0.0"), Ordering::Equal);
        assert_eq!(version_cmp("v1.0.0", "v1.0.1"), Ordering::Less);
        assert_eq!(version_cmp("v010", "v9"), Ordering::Greater);
        assert_eq!(version_cmp("v1.0", "v1.0.1"), Ordering::Less);
    }

    #[test]
    fn test_latest_tag_mixed_prefixes() {
        // digits rank below letters, as with `sort -V`
        assert_eq!(latest_tag("1.0.0\nv0.9\n"), Some("v0.9".to_string()));
        assert_eq!(latest_tag("v1.0\nv1.0a"), Some("v1.0a".to_string()));
    }

    #[test]
    fn test_version_cmp_tilde_and_suffixes() {
        assert_eq!(version_cmp("v1.0~rc1", "v1.0"), Ordering::Less);
        assert_eq!(version_cmp("v1.0-rc1", "v1.0"), Ordering::Greater);
        assert_eq!(version_cmp("v1.0-rc1", "v1.0.1"), Ordering::Less);
        assert_eq!(version_cmp("v1.0", "v01.0"), Ordering::Greater);
    }
}
