//! Static semantic index.
//!
//! Stands in for a vector database behind the `SemanticIndex` contract:
//! keyword refinement from a fixed per-field synonym table instead of an
//! embedding search.

use async_trait::async_trait;

use nd_core::{BusinessField, Error, SemanticIndex};

fn expansions(field: BusinessField) -> &'static [&'static str] {
    match field {
        BusinessField::Hpc => &["exascale systems", "gpu clusters", "liquid cooling"],
        BusinessField::Bitcoin => &["asic efficiency", "hashrate futures", "mining pools"],
        BusinessField::EnergyStorage => &[
            "grid-scale batteries",
            "lfp cells",
            "second-life storage",
        ],
    }
}

#[derive(Default)]
pub struct StaticSemanticIndex;

impl StaticSemanticIndex {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SemanticIndex for StaticSemanticIndex {
    fn name(&self) -> &str {
        "static-synonyms"
    }

    async fn refine_keywords(
        &self,
        field: BusinessField,
        base: &[String],
    ) -> Result<Vec<String>, Error> {
        let mut refined: Vec<String> = base.to_vec();
        for expansion in expansions(field) {
            if !refined.iter().any(|k| k.eq_ignore_ascii_case(expansion)) {
                refined.push(expansion.to_string());
            }
        }
        Ok(refined)
    }
}
