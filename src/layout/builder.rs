//! Model builder: schema-checked records → built component banks → model.

use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::edge::{BinarizeOptions, EdgeTypeFilter};
use crate::energy::{
    BoolWeightsEnergy, EdgeMatchEnergy, EnergyFunction, EnergyMode, HamiltonianEnergy,
};
use crate::model::EdgeType;
use crate::network::{ComponentBank, Model, Topology};
use crate::nonlinearity::{Nonlinearity, NonlinearityMode};
use crate::{Error, Result};
use super::tensor::{self, Tensor};
use super::{ComponentBankRecord, ModelFile, normalize_token};

// ============================================================================
// Build options
// ============================================================================

/// Settings that the model file does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Energy function for every bank of the model.
    pub energy_mode: EnergyMode,
    /// Edge types encoded by the boolean-weights energy. A record's
    /// `do_include_null` / `do_include_all_16` fields take precedence.
    #[serde(default)]
    pub binarize: BinarizeOptions,
}

impl BuildOptions {
    pub fn new(energy_mode: EnergyMode) -> Self {
        Self {
            energy_mode,
            binarize: BinarizeOptions::default(),
        }
    }

    pub fn with_binarize(mut self, binarize: BinarizeOptions) -> Self {
        self.binarize = binarize;
        self
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builds [`Model`]s from model files under fixed [`BuildOptions`].
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    options: BuildOptions,
}

impl ModelBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Normalize, validate structure and modes, then build every bank.
    ///
    /// Topology, tier count and nonlinearity modes are all checked before
    /// any tensor is converted.
    pub fn build(&self, file: &ModelFile) -> Result<Model> {
        let file = file.clone().normalized();

        let topology = Topology::parse(&file.links)?;
        topology.check_layout(file.layout.len())?;
        let modes = file
            .layout
            .iter()
            .map(|record| record.nonlinearity_mode.parse::<NonlinearityMode>())
            .collect::<Result<Vec<_>>>()?;

        let banks = file
            .layout
            .iter()
            .zip(modes)
            .map(|(record, mode)| self.build_bank(record, mode))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            %topology,
            energy_mode = %self.options.energy_mode,
            "built model"
        );
        Ok(Model::new(topology, banks)?.with_comment(file.comment))
    }

    /// Build one bank. `record.name` is normalized here as well so the
    /// method can be used on its own.
    pub fn build_bank(
        &self,
        record: &ComponentBankRecord,
        nonlinearity_mode: NonlinearityMode,
    ) -> Result<ComponentBank> {
        let energy = self.build_energy(record)?;
        let nonlinearity = match nonlinearity_mode {
            NonlinearityMode::None => Nonlinearity::Identity,
            NonlinearityMode::Max => Nonlinearity::max(&learned_edge_states(record)?)?,
            NonlinearityMode::MaxAbs => Nonlinearity::max_abs(&learned_edge_states(record)?)?,
            NonlinearityMode::Kwta => Nonlinearity::KWinnerTakeAll {
                n_winners: usize::try_from(record.n_winners).map_err(|_| {
                    Error::Schema(format!(
                        "n_winners must be non-negative for kwta, got {}",
                        record.n_winners
                    ))
                })?,
            },
            NonlinearityMode::Nonzero => Nonlinearity::NonzeroThreshold,
        };
        if let Nonlinearity::Max(groups) | Nonlinearity::MaxAbs(groups) = &nonlinearity {
            if groups.n_inputs() != energy.n_cmp() {
                return Err(Error::ShapeMismatch(format!(
                    "energy scores {} components but pooling groups {} rows of learned_edge_states",
                    energy.n_cmp(),
                    groups.n_inputs()
                )));
            }
        }

        let name = normalize_token(&record.name);
        debug!(
            bank = %name,
            energy = %energy.mode(),
            n_cmp = energy.n_cmp(),
            nonlinearity = %nonlinearity_mode,
            "built component bank"
        );
        Ok(ComponentBank::new(name, energy, nonlinearity))
    }

    fn build_energy(&self, record: &ComponentBankRecord) -> Result<EnergyFunction> {
        Ok(match self.options.energy_mode {
            EnergyMode::Hamiltonian => {
                let h = Tensor::from_json("h", &record.h)?.into_array3("h")?;
                let k = Tensor::from_json("k", &record.k)?.into_vector("k")?;
                EnergyFunction::Hamiltonian(HamiltonianEnergy::new(h, k)?)
            }
            EnergyMode::EdgeMatch => EnergyFunction::EdgeMatch(EdgeMatchEnergy::new(
                learned_edge_states(record)?,
                tensor::endpoint_pairs("edge_endnode_idx", &record.edge_endnode_idx)?,
                edge_type_filter(record)?,
            )?),
            EnergyMode::BoolWeights => EnergyFunction::BoolWeights(BoolWeightsEnergy::new(
                &learned_edge_states(record)?,
                tensor::endpoint_pairs("edge_endnode_idx", &record.edge_endnode_idx)?,
                edge_type_filter(record)?,
                self.binarize_options(record),
            )?),
        })
    }

    fn binarize_options(&self, record: &ComponentBankRecord) -> BinarizeOptions {
        BinarizeOptions {
            include_null: record
                .do_include_null
                .unwrap_or(self.options.binarize.include_null),
            include_all_16: record
                .do_include_all_16
                .unwrap_or(self.options.binarize.include_all_16),
        }
    }
}

fn learned_edge_states(record: &ComponentBankRecord) -> Result<Array2<EdgeType>> {
    tensor::edge_state_matrix("learned_edge_states", &record.learned_edge_states)
}

fn edge_type_filter(record: &ComponentBankRecord) -> Result<EdgeTypeFilter> {
    Ok(EdgeTypeFilter::new(tensor::edge_type_list(
        "edge_type_filter",
        &record.edge_type_filter,
    )?))
}

/// Load a `*.hnetmodel.json` file and build it.
pub fn build_model_from_file(path: impl AsRef<Path>, options: &BuildOptions) -> Result<Model> {
    let file = ModelFile::load(path)?;
    ModelBuilder::new(*options).build(&file)
}
