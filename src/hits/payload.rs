use std::fmt::Display;

/// Process that created the detected optical photon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum CreatorProcess {
    Scintillation,
    Cerenkov,
    #[default]
    Other,
}

impl Display for CreatorProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreatorProcess::Scintillation => write!(f, "scintillation"),
            CreatorProcess::Cerenkov => write!(f, "cerenkov"),
            CreatorProcess::Other => write!(f, "other"),
        }
    }
}

/// Payload categories recorded by the detector elements.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum HitPayload {
    /// An optical photon absorbed by a photosensor.
    Optical {
        #[cfg_attr(feature = "serde", serde(default))]
        process: CreatorProcess,
        energy_ev: f64,
    },
    /// Energy deposited in a sensitive volume.
    Deposit { edep_mev: f64 },
}

impl Display for HitPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HitPayload::Optical { process, energy_ev } => {
                write!(f, "optical ({process}) {energy_ev:.3} eV")
            }
            HitPayload::Deposit { edep_mev } => write!(f, "deposit {edep_mev:.3} MeV"),
        }
    }
}
