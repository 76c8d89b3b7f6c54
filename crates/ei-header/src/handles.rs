//! Impulse handle discovery.
//!
//! Generated variables headers declare one handle per impulse:
//! `ei_impulse_handle_t impulse_handle_<project>_<slot> = ...;`

use std::fmt;
use std::sync::OnceLock;

use regex_lite::Regex;

fn handle_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bei_impulse_handle_t\s+impulse_handle_([0-9]+)_([0-9]+)\b")
            .expect("handle pattern is valid")
    })
}

/// A declared impulse handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpulseHandle {
    pub project_id: u64,
    pub slot: u32,
}

impl ImpulseHandle {
    pub fn new(project_id: u64, slot: u32) -> Self {
        Self { project_id, slot }
    }

    /// Symbol name as the generator spells it.
    pub fn symbol(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ImpulseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "impulse_handle_{}_{}", self.project_id, self.slot)
    }
}

/// Every handle declaration in `text`, in source order.
///
/// Identifiers too large for the numeric types are skipped.
pub fn find_impulse_handles(text: &str) -> Vec<ImpulseHandle> {
    handle_decl_re()
        .captures_iter(text)
        .filter_map(|caps| {
            let project_id = caps[1].parse().ok()?;
            let slot = caps[2].parse().ok()?;
            Some(ImpulseHandle { project_id, slot })
        })
        .collect()
}

/// The lowest-slot handle declared in `text`, restricted to `project_id`
/// when one is given.
pub fn resolve_handle(text: &str, project_id: Option<u64>) -> Option<ImpulseHandle> {
    find_impulse_handles(text)
        .into_iter()
        .filter(|h| project_id.map_or(true, |id| h.project_id == id))
        .min_by_key(|h| h.slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "\
ei_impulse_handle_t impulse_handle_872791_1 = ei_impulse_handle_t( &impulse_872791_1 );
ei_impulse_handle_t impulse_handle_872791_0 = ei_impulse_handle_t( &impulse_872791_0 );
ei_impulse_handle_t& ei_default_impulse = impulse_handle_872791_0;
";

    #[test]
    fn test_find_skips_reference_alias() {
        let handles = find_impulse_handles(BODY);
        assert_eq!(
            handles,
            vec![ImpulseHandle::new(872791, 1), ImpulseHandle::new(872791, 0)]
        );
    }

    #[test]
    fn test_resolve_lowest_slot() {
        let handle = resolve_handle(BODY, None).unwrap();
        assert_eq!(handle.symbol(), "impulse_handle_872791_0");
    }

    #[test]
    fn test_resolve_filters_by_project() {
        let text = format!(
            "{BODY}ei_impulse_handle_t impulse_handle_874563_2 = ei_impulse_handle_t( &impulse_874563_2 );\n"
        );
        assert_eq!(
            resolve_handle(&text, Some(874563)),
            Some(ImpulseHandle::new(874563, 2))
        );
        assert_eq!(resolve_handle(&text, Some(1)), None);
    }

    #[test]
    fn test_resolve_none_when_absent() {
        assert_eq!(resolve_handle("int a;\n", None), None);
    }

    #[test]
    fn test_display_matches_symbol() {
        let handle = ImpulseHandle::new(874563, 1);
        assert_eq!(handle.to_string(), handle.symbol());
    }
}
