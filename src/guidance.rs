//! Disposal guidance for each waste category.

use std::collections::HashMap;

use crate::error::PredictError;
use crate::mapping::{LabelSet, WasteLabel};

/// A single disposal recommendation, either advised or to be avoided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub advised: bool,
    pub title: &'static str,
    pub detail: &'static str,
}

const fn advise(title: &'static str, detail: &'static str) -> Method {
    Method { advised: true, title, detail }
}

const fn avoid(title: &'static str, detail: &'static str) -> Method {
    Method { advised: false, title, detail }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guidance {
    pub common_types: &'static str,
    pub methods: Vec<Method>,
}

impl Guidance {
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<strong>Common Types:</strong> {} <br>\n<strong>Best Disposal Methods:</strong>\n<ul>\n",
            self.common_types
        );
        for method in &self.methods {
            html.push_str(&format!(
                "<li>{} <strong>{}:</strong> {}</li>\n",
                mark(method.advised),
                method.title,
                method.detail
            ));
        }
        html.push_str("</ul>");
        html
    }

    pub fn to_text(&self) -> String {
        let mut text = format!("Common types: {}\nBest disposal methods:\n", self.common_types);
        for method in &self.methods {
            text.push_str(&format!(
                "  {} {}: {}\n",
                mark(method.advised),
                method.title,
                method.detail
            ));
        }
        text
    }
}

fn mark(advised: bool) -> &'static str {
    if advised { "✅" } else { "❌" }
}

/// Built-in guidance. Exhaustive over [`WasteLabel`].
pub fn builtin_guidance(label: WasteLabel) -> Guidance {
    match label {
        WasteLabel::Organic => Guidance {
            common_types: "Crop residues, sugarcane leaves, fruit peels, manure.",
            methods: vec![
                advise("Composting", "Converts waste into fertilizer, enriching soil."),
                advise("Mulching", "Leaves and stalks can be spread on the farm to retain moisture."),
                advise("Bioenergy", "Large-scale farms can use biogas plants to generate energy."),
                avoid("Avoid Burning", "Burning releases harmful gases, worsening air pollution."),
            ],
        },
        WasteLabel::Plastic => Guidance {
            common_types: "Pesticide bottles, plastic mulch, packaging.",
            methods: vec![
                advise("Recycling", "Sort plastics by type and send to a recycling center."),
                advise("Reusing", "Consider repurposing plastic containers for storage."),
                avoid("Avoid Burning", "Releases toxic chemicals harmful to health and crops."),
                advise("Disposal Centers", "Drop off non-recyclable plastic at authorized waste centers."),
            ],
        },
        WasteLabel::Chemical => Guidance {
            common_types: "Expired pesticides, fertilizers, herbicides.",
            methods: vec![
                advise("Proper Storage", "Store in leak-proof containers away from water sources."),
                advise(
                    "Authorized Disposal",
                    "Contact local agricultural offices for hazardous waste collection.",
                ),
                avoid("Avoid Dumping", "Never dispose of chemicals in soil or water bodies."),
                advise(
                    "Reuse Guidelines",
                    "Some fertilizers can be diluted and used safely if not expired.",
                ),
            ],
        },
        WasteLabel::Metal => Guidance {
            common_types: "Rusted tools, machinery parts, wires.",
            methods: vec![
                advise("Recycling", "Scrap metal can be sold or sent for melting and reuse."),
                advise("Repurposing", "Old tools can be repaired or turned into new equipment."),
                avoid("Avoid Dumping", "Metals rust and contaminate soil and water."),
                advise("Safe Storage", "Keep sharp metal waste in designated bins to prevent injuries."),
            ],
        },
        WasteLabel::Glass => Guidance {
            common_types: "Broken greenhouse panels, glass bottles.",
            methods: vec![
                advise("Recycling", "Glass can be melted and remolded into new products."),
                advise("Repurposing", "Broken glass can be ground and used in construction."),
                avoid("Avoid Open Disposal", "Sharp glass pieces pose a risk to people and animals."),
                advise("Safe Handling", "Use gloves and store glass waste in thick containers."),
            ],
        },
    }
}

/// Guidance entries checked against an active label set.
#[derive(Debug, Clone)]
pub struct GuidanceBook {
    entries: HashMap<WasteLabel, Guidance>,
}

impl GuidanceBook {
    /// Builds a book from arbitrary entries. Every label in `active` must have
    /// an entry; extra entries are kept.
    pub fn new(
        entries: impl IntoIterator<Item = (WasteLabel, Guidance)>,
        active: &LabelSet,
    ) -> Result<Self, PredictError> {
        let book = Self {
            entries: entries.into_iter().collect(),
        };
        book.check(active)?;
        Ok(book)
    }

    /// Fails with the first label in `active` that has no entry.
    pub fn check(&self, active: &LabelSet) -> Result<(), PredictError> {
        match active.iter().find(|label| !self.entries.contains_key(label)) {
            Some(label) => Err(PredictError::MissingGuidance { label }),
            None => Ok(()),
        }
    }

    /// The built-in book covering every known label.
    pub fn builtin() -> Self {
        Self {
            entries: WasteLabel::ALL
                .into_iter()
                .map(|label| (label, builtin_guidance(label)))
                .collect(),
        }
    }

    pub fn lookup(&self, label: WasteLabel) -> Result<&Guidance, PredictError> {
        self.entries
            .get(&label)
            .ok_or(PredictError::MissingGuidance { label })
    }
}
