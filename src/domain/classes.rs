use serde::Serialize;
use std::collections::BTreeMap;

/// Labels the bundled waste model was trained with.
const WASTE_CLASSES: [(u32, &str); 6] = [
    (0, "Botol Plastik"),
    (1, "Kaca"),
    (2, "Kaleng"),
    (3, "Kardus"),
    (4, "Kertas"),
    (5, "Plastik"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassLabel {
    pub id: u32,
    pub name: String,
}

/// Immutable class id → display label mapping.
///
/// Lookups never fail: ids the model emits but the table does not know get a
/// synthesized `Class_<id>` label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassCatalog {
    labels: BTreeMap<u32, String>,
}

impl ClassCatalog {
    pub fn new(labels: impl IntoIterator<Item = ClassLabel>) -> Self {
        Self {
            labels: labels.into_iter().map(|l| (l.id, l.name)).collect(),
        }
    }

    pub fn waste() -> Self {
        Self::new(WASTE_CLASSES.iter().map(|&(id, name)| ClassLabel {
            id,
            name: name.to_string(),
        }))
    }

    pub fn label(&self, class_id: u32) -> String {
        self.labels
            .get(&class_id)
            .cloned()
            .unwrap_or_else(|| format!("Class_{}", class_id))
    }

    pub(crate) fn len(&self) -> usize {
        self.labels.len()
    }
}

impl Default for ClassCatalog {
    fn default() -> Self {
        Self::waste()
    }
}
