//! Fixed option lists for the select-style fields.

pub struct CatalogEntry {
    pub value: &'static str,
    pub label: &'static str,
}

pub const BRANCHES: &[CatalogEntry] = &[
    CatalogEntry { value: "ca", label: "Computer Applications" },
    CatalogEntry { value: "cs", label: "Computer Science" },
    CatalogEntry { value: "ee", label: "Electrical Engineering" },
    CatalogEntry { value: "me", label: "Mechanical Engineering" },
];

pub const COURSES: &[CatalogEntry] = &[
    CatalogEntry { value: "mtech", label: "BCA" },
    CatalogEntry { value: "phd", label: "BBA" },
    CatalogEntry { value: "btech", label: "B.Tech" },
];

pub fn contains(catalog: &[CatalogEntry], value: &str) -> bool {
    catalog.iter().any(|e| e.value == value)
}

pub fn label_of(catalog: &[CatalogEntry], value: &str) -> Option<&'static str> {
    catalog.iter().find(|e| e.value == value).map(|e| e.label)
}
