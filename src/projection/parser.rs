use super::context::{ProjectionContext, SelectionSpec};

/// Parsed form of the `fields` query parameter.
#[derive(Debug, Clone, Default)]
pub struct FieldSelection {
    /// Top-level selection; `None` means no restriction was supplied.
    pub top: Option<SelectionSpec>,
    /// Nested selections keyed by relation name, shared down the recursion.
    pub context: ProjectionContext,
}

impl FieldSelection {
    /// A selection that keeps everything.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn top(&self) -> Option<&SelectionSpec> {
        self.top.as_ref()
    }
}

/// Parse a comma-separated selection string into a [`FieldSelection`].
///
/// Each token is either a bare field name (`title`) or a nested path joined
/// by a double underscore (`category_obj__name`). The first segment of a
/// nested path counts as a top-level selection of that relation; the
/// remainder accumulates into the relation's nested spec. Only one level of
/// nesting is split out - anything after the first `__` is kept as a single
/// sub-token.
///
/// Nothing is validated against a schema here: unknown names survive
/// parsing and are dropped later by the serializer.
pub fn parse_fields(raw: Option<&str>) -> FieldSelection {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return FieldSelection::unrestricted(),
    };

    let mut top = SelectionSpec::new();
    let mut context = ProjectionContext::empty();

    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match token.split_once("__") {
            Some((relation, rest)) if !relation.is_empty() && !rest.is_empty() => {
                top.insert(relation);
                context.entry(relation).insert(rest);
            }
            _ => top.insert(token),
        }
    }

    FieldSelection { top: Some(top), context }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_blank_means_unrestricted() {
        assert!(parse_fields(None).top.is_none());
        assert!(parse_fields(Some("")).top.is_none());
        assert!(parse_fields(Some("   ")).top.is_none());
    }

    #[test]
    fn bare_tokens_become_top_level_selection() {
        let sel = parse_fields(Some("title,sale_price"));
        let top = sel.top.unwrap();
        assert!(top.contains("title"));
        assert!(top.contains("sale_price"));
        assert_eq!(top.len(), 2);
        assert!(sel.context.is_empty());
    }

    #[test]
    fn nested_paths_select_the_relation_and_accumulate() {
        let sel = parse_fields(Some("category_obj__name,category_obj__id,title"));
        let top = sel.top.unwrap();
        assert!(top.contains("category_obj"));
        assert!(top.contains("title"));

        let nested = sel.context.nested("category_obj").unwrap();
        assert!(nested.contains("name"));
        assert!(nested.contains("id"));
        assert_eq!(nested.len(), 2);
    }

    #[test]
    fn only_one_nesting_level_is_split() {
        let sel = parse_fields(Some("chapters__lessons__title"));
        let top = sel.top.unwrap();
        assert!(top.contains("chapters"));
        let nested = sel.context.nested("chapters").unwrap();
        assert!(nested.contains("lessons__title"));
    }

    #[test]
    fn parse_is_deterministic_regardless_of_token_order() {
        let a = parse_fields(Some("title,category_obj__name,category_obj__id"));
        let b = parse_fields(Some("category_obj__id,title,category_obj__name"));
        assert_eq!(a.top, b.top);
        assert_eq!(a.context.nested("category_obj"), b.context.nested("category_obj"));
    }

    #[test]
    fn whitespace_and_empty_tokens_are_skipped() {
        let sel = parse_fields(Some(" title , ,chapters__order_no"));
        let top = sel.top.unwrap();
        assert_eq!(top.len(), 2);
        assert!(top.contains("title"));
        assert!(top.contains("chapters"));
    }

    #[test]
    fn degenerate_separators_are_kept_as_bare_names() {
        // "__x" and "x__" have no usable relation/suffix split.
        let sel = parse_fields(Some("__name,video__"));
        let top = sel.top.unwrap();
        assert!(top.contains("__name"));
        assert!(top.contains("video__"));
        assert!(sel.context.is_empty());
    }
}
