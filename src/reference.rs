//! Reference tables used as the sampling universe for record generation.
//!
//! The tables are plain immutable values. [`ReferenceTables::standard`] returns
//! the laboratory dataset; tests and callers can build their own.

/// Instrument manufacturers
const MANUFACTURERS: &[&str] = &[
    "Zeiss",
    "Thermo Scientific",
    "Agilent",
    "Bio-Rad",
    "Eppendorf",
    "JEOL",
    "Leica",
    "Nikon",
    "Beckman Coulter",
    "Shimadzu",
    "Olympus",
    "Waters",
    "Perkin Elmer",
    "Bruker",
    "Mettler Toledo",
];

const EQUIPMENT_TYPES: &[EquipmentType] = &[
    EquipmentType {
        category: "Microscopes",
        model_prefixes: &["LSM", "Axio", "BX", "DMi8", "Eclipse"],
        tags: &["microscope", "imaging"],
        base_price: 75_000,
        price_variance: 25_000,
    },
    EquipmentType {
        category: "Centrifuges",
        model_prefixes: &["Avanti", "Sorvall", "Optima", "Allegra", "5920"],
        tags: &["centrifuge", "sample prep"],
        base_price: 40_000,
        price_variance: 15_000,
    },
    EquipmentType {
        category: "Chromatography",
        model_prefixes: &["HPLC", "UPLC", "Nexera", "Ultimate", "1260"],
        tags: &["HPLC", "analysis"],
        base_price: 65_000,
        price_variance: 20_000,
    },
    EquipmentType {
        category: "PCR Equipment",
        model_prefixes: &["CFX", "QuantStudio", "LightCycler", "ProFlex", "T100"],
        tags: &["PCR", "gene expression"],
        base_price: 25_000,
        price_variance: 10_000,
    },
    EquipmentType {
        category: "Cell Culture",
        model_prefixes: &["CellXpert", "HeraCell", "Galaxy", "MCO", "DirectHeat"],
        tags: &["incubator", "cell culture"],
        base_price: 15_000,
        price_variance: 5_000,
    },
];

const LOCATIONS: &[&str] = &[
    // Research labs (20)
    "Cell Biology Lab A",
    "Cell Biology Lab B",
    "Cell Biology Lab C",
    "Cell Biology Lab D",
    "Biochemistry Lab 1",
    "Biochemistry Lab 2",
    "Biochemistry Lab 3",
    "Biochemistry Lab 4",
    "Molecular Biology Lab A",
    "Molecular Biology Lab B",
    "Molecular Biology Lab C",
    "Genetics Lab 1",
    "Genetics Lab 2",
    "Genetics Lab 3",
    "Microbiology Lab A",
    "Microbiology Lab B",
    "Microbiology Lab C",
    "Immunology Lab 1",
    "Immunology Lab 2",
    "Immunology Lab 3",
    // Core facilities (10)
    "Genomics Facility",
    "Proteomics Facility",
    "Metabolomics Facility",
    "Flow Cytometry Core",
    "Mass Spectrometry Core",
    "Crystallography Core",
    "Electron Microscopy Suite",
    "Live Cell Imaging Facility",
    "Bioinformatics Center",
    "High-Performance Computing Lab",
    // Specialized labs (10)
    "Drug Discovery Unit",
    "Antibody Development Lab",
    "Stem Cell Research Center",
    "Tissue Culture Facility",
    "Animal Research Facility",
    "Plant Science Lab",
    "Bioengineering Lab",
    "Synthetic Biology Lab",
    "Nanobiotechnology Lab",
    "Systems Biology Lab",
    // Clinical and research support (10)
    "Clinical Research Lab 1",
    "Clinical Research Lab 2",
    "Translational Research Lab 1",
    "Translational Research Lab 2",
    "Pathology Lab",
    "Histology Lab",
    "Quality Control Lab",
    "Method Development Lab",
    "Environmental Testing Lab",
    "Analytical Chemistry Lab",
];

const CUSTODIANS: &[&str] = &[
    // Professors (12)
    "Prof. Michael Chen",
    "Prof. Sarah Williams",
    "Prof. David Rodriguez",
    "Prof. Emily Taylor",
    "Prof. James Wilson",
    "Prof. Maria Garcia",
    "Prof. Robert Johnson",
    "Prof. Lisa Anderson",
    "Prof. Thomas Brown",
    "Prof. Jennifer Lee",
    "Prof. William Davis",
    "Prof. Elizabeth Martinez",
    // Associate professors (12)
    "Assoc. Prof. Richard Kim",
    "Assoc. Prof. Laura Smith",
    "Assoc. Prof. John Zhang",
    "Assoc. Prof. Amanda White",
    "Assoc. Prof. Daniel Park",
    "Assoc. Prof. Sofia Patel",
    "Assoc. Prof. Kevin Wong",
    "Assoc. Prof. Rachel Green",
    "Assoc. Prof. Carlos Lopez",
    "Assoc. Prof. Michelle Thompson",
    "Assoc. Prof. Christopher Lee",
    "Assoc. Prof. Jessica Chen",
    // Research group leaders (13)
    "Dr. Andrew Wilson",
    "Dr. Nicole Anderson",
    "Dr. Matthew Brown",
    "Dr. Victoria Davis",
    "Dr. Benjamin Liu",
    "Dr. Sophia Rodriguez",
    "Dr. Katherine White",
    "Dr. Alexander Wong",
    "Dr. Isabella Santos",
    "Dr. Jonathan Lee",
    "Dr. Margaret Chen",
    "Dr. Richard Brown",
    "Dr. Emma Thompson",
    // Facility managers (13)
    "Lab Mgr. David Palmer",
    "Lab Mgr. Susan Martinez",
    "Lab Mgr. Michael Roberts",
    "Lab Mgr. Laura Wilson",
    "Lab Mgr. Robert Taylor",
    "Lab Mgr. Sarah Johnson",
    "Lab Mgr. Mark Thompson",
    "Lab Mgr. Anna Garcia",
    "Lab Mgr. Paul Zhang",
    "Lab Mgr. Linda Kim",
    "Lab Mgr. Steven Lee",
    "Lab Mgr. Rebecca Wilson",
    "Lab Mgr. Peter Wang",
];

/// A class of equipment with its naming and pricing rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipmentType {
    pub category: &'static str,
    pub model_prefixes: &'static [&'static str],
    /// The first tag is used in the record description
    pub tags: &'static [&'static str],
    pub base_price: i64,
    pub price_variance: i64,
}

impl EquipmentType {
    /// Tag used in the description ("... for {primary_tag}")
    pub fn primary_tag(&self) -> &'static str {
        self.tags.first().copied().unwrap_or(self.category)
    }

    /// Inclusive valuation bounds for this type
    pub fn price_range(&self) -> (i64, i64) {
        (
            self.base_price - self.price_variance,
            self.base_price + self.price_variance,
        )
    }
}

/// The sampling universe for a generation run
#[derive(Debug, Clone, Copy)]
pub struct ReferenceTables {
    pub manufacturers: &'static [&'static str],
    pub equipment_types: &'static [EquipmentType],
    pub locations: &'static [&'static str],
    pub custodians: &'static [&'static str],
}

impl ReferenceTables {
    /// The laboratory equipment dataset
    pub const fn standard() -> Self {
        Self {
            manufacturers: MANUFACTURERS,
            equipment_types: EQUIPMENT_TYPES,
            locations: LOCATIONS,
            custodians: CUSTODIANS,
        }
    }

    /// Look up an equipment type by category name
    pub fn equipment_type(&self, category: &str) -> Option<&'static EquipmentType> {
        self.equipment_types.iter().find(|t| t.category == category)
    }

    /// Fails if any table is empty, since sampling from it would be impossible
    pub fn ensure_sampleable(&self) -> anyhow::Result<()> {
        if self.manufacturers.is_empty() {
            anyhow::bail!("reference tables contain no manufacturers");
        }
        if self.equipment_types.is_empty() {
            anyhow::bail!("reference tables contain no equipment types");
        }
        if self.locations.is_empty() {
            anyhow::bail!("reference tables contain no locations");
        }
        if self.custodians.is_empty() {
            anyhow::bail!("reference tables contain no custodians");
        }
        for equipment in self.equipment_types {
            if equipment.model_prefixes.is_empty() {
                anyhow::bail!("equipment type {} has no model prefixes", equipment.category);
            }
            if equipment.tags.is_empty() {
                anyhow::bail!("equipment type {} has no tags", equipment.category);
            }
            if equipment.price_variance < 0 {
                anyhow::bail!(
                    "equipment type {} has a negative price variance",
                    equipment.category
                );
            }
        }
        Ok(())
    }
}
