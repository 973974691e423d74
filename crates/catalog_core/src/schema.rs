/// Static description of a remote collection's columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl CollectionSchema {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| *c == column)
    }
}

pub const JOURNALS: CollectionSchema = CollectionSchema {
    name: "journals",
    columns: &[
        "id",
        "title",
        "description",
        "category",
        "publisher",
        "issn",
        "image_url",
        "status",
        "featured",
        "open_access",
        "views_count",
        "citation_count",
        "created_at",
    ],
};

pub const PROFILES: CollectionSchema = CollectionSchema {
    name: "profiles",
    columns: &["id", "full_name", "role", "approval", "created_at"],
};

pub const EDITORIAL_BOARD: CollectionSchema = CollectionSchema {
    name: "editorial_board",
    columns: &["id", "full_name", "role_type", "active", "journal_id"],
};
