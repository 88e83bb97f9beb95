//! Static search-term catalog.
//!
//! Holds the boolean query expressions issued against the metadata API, the
//! keyword indicator lists used by the record filter, and the out-of-scope
//! exclusion list. This is reviewed configuration data: editing it changes
//! search coverage, not code behavior.

use crate::error::{Result, SearchError};
use std::fmt;

/// The five assessment tasks covered by the review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {
    /// Dimensions, cross-sections, reinforcement layout, connections
    Geometry,
    /// Characteristic strength values and design requirements
    Strength,
    /// Corrosion, decay, chemical attack, residual capacity
    Deterioration,
    /// Cracks, voids, delaminations, hidden damage
    Defects,
    /// Moisture content and moisture-related degradation
    Moisture,
}

impl Task {
    pub const ALL: [Task; 5] = [
        Task::Geometry,
        Task::Strength,
        Task::Deterioration,
        Task::Defects,
        Task::Moisture,
    ];

    /// Report label used in exports and statistics.
    pub fn label(&self) -> &'static str {
        match self {
            Task::Geometry => "geometry verification",
            Task::Strength => "strength estimation",
            Task::Deterioration => "deterioration assessment",
            Task::Defects => "defect identification",
            Task::Moisture => "moisture condition",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four structural material classes covered by the review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Material {
    ReinforcedConcrete,
    StructuralSteel,
    Timber,
    Masonry,
}

impl Material {
    pub const ALL: [Material; 4] = [
        Material::ReinforcedConcrete,
        Material::StructuralSteel,
        Material::Timber,
        Material::Masonry,
    ];

    /// Report label used in exports and statistics.
    pub fn label(&self) -> &'static str {
        match self {
            Material::ReinforcedConcrete => "reinforced concrete",
            Material::StructuralSteel => "structural steel",
            Material::Timber => "timber",
            Material::Masonry => "masonry",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single boolean search expression with its task/material tag.
#[derive(Debug, Clone, Copy)]
pub struct QueryTerm {
    /// Boolean expression sent to the search endpoint verbatim
    pub expression: &'static str,
    pub task: Task,
    pub material: Material,
}

const fn term(expression: &'static str, task: Task, material: Material) -> QueryTerm {
    QueryTerm {
        expression,
        task,
        material,
    }
}

use Material::{Masonry, ReinforcedConcrete as Rc, StructuralSteel as Steel, Timber};
use Task::{Defects, Deterioration, Geometry, Moisture, Strength};

/// The full search-term catalog: 70 expressions, every task/material cell
/// covered by at least one targeted term.
static TERMS: [QueryTerm; 70] = [
    // Task 1: Geometry verification
    term(r#""reinforcement mapping" "ground penetrating radar""#, Geometry, Rc),
    term(r#""cover depth" concrete "non-destructive""#, Geometry, Rc),
    term(r#""rebar detection" ultrasonic"#, Geometry, Rc),
    term(r#""GPR" "reinforced concrete""#, Geometry, Rc),
    term(r#""reinforcement detection" concrete"#, Geometry, Rc),
    term(r#""cover depth measurement" concrete"#, Geometry, Rc),
    term(r#""thickness measurement" "structural steel" ultrasonic"#, Geometry, Steel),
    term(r#""section loss measurement" steel bridge"#, Geometry, Steel),
    term(r#""geometry verification" steel structure"#, Geometry, Steel),
    term(r#""section geometry" timber "non-destructive""#, Geometry, Timber),
    term(r#""dimension measurement" timber structure"#, Geometry, Timber),
    term(r#""ground penetrating radar" masonry wall"#, Geometry, Masonry),
    term(r#""structural geometry" masonry survey"#, Geometry, Masonry),
    // Task 2: Strength estimation
    term(r#""strength estimation" concrete"#, Strength, Rc),
    term(r#""rebound hammer" concrete strength"#, Strength, Rc),
    term(r#""compressive strength" "non-destructive" concrete"#, Strength, Rc),
    term(r#""sonreb" concrete"#, Strength, Rc),
    term(r#""pull-out test" concrete"#, Strength, Rc),
    term(r#""in-situ strength" concrete"#, Strength, Rc),
    term(r#""ultrasonic pulse velocity" strength concrete"#, Strength, Rc),
    term(r#""characteristic value" strength concrete"#, Strength, Rc),
    term(r#""schmidt hammer" concrete"#, Strength, Rc),
    term(r#""tensile strength" "structural steel" "non-destructive""#, Strength, Steel),
    term(r#""residual strength" steel structure"#, Strength, Steel),
    term(r#""visual grading" timber strength"#, Strength, Timber),
    term(r#""timber structure" "non-destructive""#, Strength, Timber),
    term(r#""load capacity" timber beam"#, Strength, Timber),
    term(r#""flat-jack" masonry"#, Strength, Masonry),
    term(r#""compressive strength" masonry "non-destructive""#, Strength, Masonry),
    // Task 3: Deterioration assessment
    term(r#""corrosion detection" "reinforced concrete""#, Deterioration, Rc),
    term(r#""half-cell potential" corrosion"#, Deterioration, Rc),
    term(r#""carbonation depth" concrete"#, Deterioration, Rc),
    term(r#""chloride penetration" concrete"#, Deterioration, Rc),
    term(r#""corrosion assessment" concrete"#, Deterioration, Rc),
    term(r#""corrosion rate" reinforcement"#, Deterioration, Rc),
    term(r#""service life" concrete "non-destructive""#, Deterioration, Rc),
    term(r#""durability assessment" concrete"#, Deterioration, Rc),
    term(r#""degradation assessment" concrete"#, Deterioration, Rc),
    term(r#""non-destructive evaluation" concrete bridge"#, Deterioration, Rc),
    term(r#""corrosion assessment" steel bridge"#, Deterioration, Steel),
    term(r#""section loss" corrosion "structural steel""#, Deterioration, Steel),
    term(r#""decay assessment" timber"#, Deterioration, Timber),
    term(r#""resistance drilling" timber"#, Deterioration, Timber),
    term(r#""resistograph" timber"#, Deterioration, Timber),
    term(r#""historic masonry" assessment"#, Deterioration, Masonry),
    term(r#""heritage building" "non-destructive""#, Deterioration, Masonry),
    term(r#""degradation assessment" masonry"#, Deterioration, Masonry),
    // Task 4: Defect identification
    term(r#""crack detection" concrete"#, Defects, Rc),
    term(r#""delamination detection" concrete"#, Defects, Rc),
    term(r#""impact echo" concrete"#, Defects, Rc),
    term(r#""void detection" concrete"#, Defects, Rc),
    term(r#""defect detection" concrete"#, Defects, Rc),
    term(r#""ultrasonic testing" concrete defect"#, Defects, Rc),
    term(r#""non-destructive testing" "reinforced concrete""#, Defects, Rc),
    term(r#""flaw detection" steel"#, Defects, Steel),
    term(r#""non-destructive testing" "structural steel""#, Defects, Steel),
    term(r#""magnetic particle testing" steel weld"#, Defects, Steel),
    term(r#""damage detection" timber "non-destructive""#, Defects, Timber),
    term(r#""defect detection" timber ultrasonic"#, Defects, Timber),
    term(r#""crack mapping" masonry"#, Defects, Masonry),
    term(r#""masonry structure" "non-destructive""#, Defects, Masonry),
    // Task 5: Moisture condition
    term(r#""moisture distribution" concrete"#, Moisture, Rc),
    term(r#""moisture assessment" concrete"#, Moisture, Rc),
    term(r#""water ingress" concrete structure"#, Moisture, Rc),
    term(r#""moisture condition" steel structure corrosion"#, Moisture, Steel),
    term(r#""moisture content" timber"#, Moisture, Timber),
    term(r#""moisture meter" timber"#, Moisture, Timber),
    term(r#""moisture measurement" timber building"#, Moisture, Timber),
    term(r#""infrared thermography" moisture masonry"#, Moisture, Masonry),
    term(r#""moisture measurement" masonry wall"#, Moisture, Masonry),
];

/// Core NDT method indicators. A record must mention at least one.
static NDT_METHODS: [&str; 32] = [
    // Acoustic methods
    "ultrasonic pulse velocity",
    "upv",
    "impact echo",
    "impact-echo",
    "phased array ultrasonic",
    "paut",
    "tofd",
    // Electromagnetic
    "ground penetrating radar",
    "gpr",
    "eddy current testing",
    "magnetic flux leakage",
    // Electrochemical
    "half-cell potential",
    "half cell potential",
    "resistivity measurement",
    "wenner probe",
    // Mechanical / semi-destructive
    "sonreb",
    "rebound hammer",
    "schmidt hammer",
    "pull-out test",
    "pullout test",
    "capo test",
    "lok test",
    "flat-jack",
    "flatjack",
    "resistance drilling",
    "resistograph",
    // Surface and thermal
    "magnetic particle testing",
    "dye penetrant",
    "visual grading",
    "infrared thermography",
    // General NDT
    "non-destructive",
    "nondestructive",
];

/// Structural material indicators. A record must mention at least one.
static MATERIAL_TERMS: [&str; 30] = [
    // Reinforced concrete
    "reinforced concrete",
    "rc structure",
    "rc beam",
    "rc column",
    "concrete bridge",
    "concrete building",
    "concrete structure",
    "prestressed concrete",
    "post-tensioned concrete",
    // Structural steel
    "structural steel",
    "steel structure",
    "steel bridge",
    "steel beam",
    "steel column",
    "steel connection",
    // Timber
    "timber structure",
    "timber beam",
    "timber building",
    "glulam",
    "laminated timber",
    "wood structure",
    // Masonry
    "masonry structure",
    "masonry wall",
    "masonry building",
    "brick masonry",
    "stone masonry",
    "historic masonry",
    "heritage building",
    "unreinforced masonry",
    "masonry bridge",
];

static GEOMETRY_TERMS: [&str; 14] = [
    "geometry verification",
    "geometric verification",
    "dimension measurement",
    "cross-section measurement",
    "reinforcement layout",
    "reinforcement mapping",
    "rebar detection",
    "cover depth",
    "concrete cover",
    "section geometry",
    "connection detail",
    "structural geometry",
    "thickness measurement",
    "section loss measurement",
];

static STRENGTH_TERMS: [&str; 15] = [
    "strength estimation",
    "strength assessment",
    "strength evaluation",
    "compressive strength",
    "tensile strength",
    "flexural strength",
    "characteristic strength",
    "characteristic value",
    "design value",
    "material strength",
    "load capacity",
    "residual strength",
    "in-situ strength",
    "strength prediction",
    "strength determination",
];

static DETERIORATION_TERMS: [&str; 17] = [
    "deterioration assessment",
    "deterioration evaluation",
    "corrosion detection",
    "corrosion assessment",
    "corrosion rate",
    "decay assessment",
    "decay detection",
    "wood decay",
    "chemical attack",
    "sulfate attack",
    "alkali-silica reaction",
    "residual capacity",
    "degradation assessment",
    "carbonation depth",
    "chloride penetration",
    "service life",
    "durability assessment",
];

static DEFECT_TERMS: [&str; 17] = [
    "defect identification",
    "defect detection",
    "flaw detection",
    "crack detection",
    "crack mapping",
    "crack characterization",
    "void detection",
    "void identification",
    "honeycombing",
    "delamination detection",
    "delamination assessment",
    "hidden damage",
    "internal damage",
    "damage detection",
    "fire damage",
    "impact damage",
    "structural damage",
];

static MOISTURE_TERMS: [&str; 12] = [
    "moisture content",
    "moisture measurement",
    "moisture assessment",
    "moisture condition",
    "moisture distribution",
    "moisture meter",
    "moisture-related",
    "moisture damage",
    "water ingress",
    "rising damp",
    "wetting",
    "hygroscopic",
];

/// Circular-construction context indicators. Satisfy the assessment-task
/// requirement when no task keyword matches.
static CIRCULAR_TERMS: [&str; 11] = [
    "circular construction",
    "circular economy building",
    "structural reuse",
    "component reuse",
    "element reuse",
    "building reuse",
    "material reuse",
    "deconstruction",
    "selective demolition",
    "design for disassembly",
    "reusability assessment",
];

/// Out-of-scope domain words. Any match rejects the record outright.
static EXCLUSION_TERMS: [&str; 43] = [
    // Medical / clinical
    "cancer",
    "tumor",
    "tumour",
    "patient",
    "clinical trial",
    "biomedical",
    "medical imaging",
    "cell culture",
    "pharmaceutical",
    "surgery",
    "hospital",
    "therapy",
    // Food / agriculture
    "food quality",
    "food science",
    "fruit quality",
    "vegetable",
    "meat quality",
    "agricultural",
    "crop",
    "grain",
    "fish quality",
    "poultry",
    // Non-civil manufacturing
    "aerospace",
    "aircraft",
    "wind turbine blade",
    "additive manufacturing",
    "semiconductor",
    "electronics",
    "battery",
    "lithium",
    "nuclear reactor",
    "pipeline weld",
    // Geoscience / oil & gas
    "seismic exploration",
    "oil reservoir",
    "petroleum",
    "mining exploration",
    "geological",
    "rock formation",
    // Automotive
    "automotive",
    "vehicle",
    "engine component",
    // Non-structural concrete
    "pavement",
    "asphalt",
];

/// The full query-term catalog.
pub fn terms() -> &'static [QueryTerm] {
    &TERMS
}

/// Out-of-scope exclusion words.
pub fn exclusion_terms() -> &'static [&'static str] {
    &EXCLUSION_TERMS
}

/// NDT method indicator words.
pub fn ndt_method_terms() -> &'static [&'static str] {
    &NDT_METHODS
}

/// Structural material indicator words.
pub fn material_terms() -> &'static [&'static str] {
    &MATERIAL_TERMS
}

/// Indicator words for one assessment task.
pub fn task_terms(task: Task) -> &'static [&'static str] {
    match task {
        Task::Geometry => &GEOMETRY_TERMS,
        Task::Strength => &STRENGTH_TERMS,
        Task::Deterioration => &DETERIORATION_TERMS,
        Task::Defects => &DEFECT_TERMS,
        Task::Moisture => &MOISTURE_TERMS,
    }
}

/// Circular-construction context words.
pub fn circular_terms() -> &'static [&'static str] {
    &CIRCULAR_TERMS
}

/// Sanity-check the catalog before any network call.
///
/// Every task/material cell must be covered by at least one term, no
/// expression may be empty, and the exclusion list must be non-empty.
/// A violation here is fatal for the whole run.
pub fn validate() -> Result<()> {
    for t in Task::ALL {
        for m in Material::ALL {
            if !TERMS.iter().any(|q| q.task == t && q.material == m) {
                return Err(SearchError::Config(format!(
                    "term catalog has no expression for ({t}, {m})"
                )));
            }
        }
    }
    if let Some(q) = TERMS.iter().find(|q| q.expression.trim().is_empty()) {
        return Err(SearchError::Config(format!(
            "empty search expression tagged ({}, {})",
            q.task, q.material
        )));
    }
    if EXCLUSION_TERMS.is_empty() {
        return Err(SearchError::Config("exclusion list is empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size() {
        assert_eq!(terms().len(), 70);
    }

    #[test]
    fn test_every_cell_covered() {
        for t in Task::ALL {
            for m in Material::ALL {
                assert!(
                    terms().iter().any(|q| q.task == t && q.material == m),
                    "no term for ({t}, {m})"
                );
            }
        }
    }

    #[test]
    fn test_validate_passes() {
        assert!(validate().is_ok());
    }

    #[test]
    fn test_expressions_nonempty_and_lowercase_indicators() {
        for q in terms() {
            assert!(!q.expression.trim().is_empty());
        }
        // Indicator matching is case-insensitive against lowercased text, so
        // the indicator lists themselves must be lowercase.
        for w in ndt_method_terms()
            .iter()
            .chain(material_terms())
            .chain(exclusion_terms())
            .chain(circular_terms())
        {
            assert_eq!(*w, w.to_lowercase());
        }
        for t in Task::ALL {
            for w in task_terms(t) {
                assert_eq!(*w, w.to_lowercase());
            }
        }
    }

    #[test]
    fn test_labels_are_distinct() {
        let mut labels: Vec<&str> = Task::ALL.iter().map(|t| t.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 5);
    }
}
