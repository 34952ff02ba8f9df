/// The two ticket tables the dashboard works with. They share one record
/// shape and differ only in table name, partner reference columns and the
/// pair of valid pendency owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetKind {
    Pixeon,
    Facil,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 2] = [DatasetKind::Pixeon, DatasetKind::Facil];

    pub fn config(self) -> &'static DatasetConfig {
        match self {
            DatasetKind::Pixeon => &PIXEON,
            DatasetKind::Facil => &FACIL,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pixeon" | "chamados" => Some(DatasetKind::Pixeon),
            "facil" | "fácil" | "chamados_fc" => Some(DatasetKind::Facil),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        self.config().label
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartnerRef {
    pub column: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partner {
    pub name: &'static str,
    pub counter_label: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DatasetConfig {
    pub label: &'static str,
    pub table: &'static str,
    pub numeric_ref: PartnerRef,
    pub text_ref: PartnerRef,
    pub pendency: [Partner; 2],
    pub search_notes: bool,
    /// Whether the pendency counters follow the active filters or always
    /// cover the whole dataset.
    pub pendency_counts_filtered: bool,
}

impl DatasetConfig {
    pub fn pendency_names(&self) -> [&'static str; 2] {
        [self.pendency[0].name, self.pendency[1].name]
    }

    pub fn accepts_pendency(&self, value: &str) -> bool {
        self.pendency.iter().any(|partner| partner.name == value)
    }
}

static PIXEON: DatasetConfig = DatasetConfig {
    label: "Chamados Pixeon",
    table: "chamados",
    numeric_ref: PartnerRef {
        column: "chamados_sh",
        label: "Chamado SH",
    },
    text_ref: PartnerRef {
        column: "chamados_px",
        label: "Chamado Pixeon",
    },
    pendency: [
        Partner {
            name: "Pixeon",
            counter_label: "Pendência Pixeon",
        },
        Partner {
            name: "SH",
            counter_label: "Pendência Sta Helena",
        },
    ],
    search_notes: false,
    pendency_counts_filtered: true,
};

static FACIL: DatasetConfig = DatasetConfig {
    label: "Chamados Fácil",
    table: "chamados_fc",
    numeric_ref: PartnerRef {
        column: "chamado_sd",
        label: "Chamado Nordeste",
    },
    text_ref: PartnerRef {
        column: "chamado_facil",
        label: "Chamado Fácil",
    },
    pendency: [
        Partner {
            name: "Fácil",
            counter_label: "Pendência Fácil",
        },
        Partner {
            name: "Nordeste",
            counter_label: "Pendência Nordeste",
        },
    ],
    search_notes: true,
    pendency_counts_filtered: false,
};
