//! The import pipeline, run as a fixed sequence of steps: collect the inputs (profile text or a
//! stored row), validate the naming options against the host design, run the geometric pipeline
//! and bind the parameters, and finally hand the result to the host.  Every failure happens before
//! the last step, so an aborted import never leaves anything behind in the host design.

use crate::airfoil::{
    DegreeWarning, Orientation, PlacedProfile, PlacementHint, ReferenceSelection,
    TransformOptions, parse_with_policy, resolve_selection, transform,
};
use crate::params::{BindOptions, ParameterSet, bind, validate_suffix};
use crate::store::AirfoilStore;
use crate::{ImportConfig, ImportError, Profile, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// The modeling design which receives imported profiles.
pub trait HostDesign {
    /// Whether a parameter of this name already exists in the design
    fn has_parameter(&self, name: &str) -> bool;

    /// The current value of a parameter in internal units, used for the driving dimension
    fn parameter_value(&self, name: &str) -> Option<f64>;

    /// Create all parameters of the set, in order, with their expressions
    fn add_parameters(&mut self, parameters: &ParameterSet);

    /// Create the two control point curves and the geometry named by the placement hints
    fn place_curves(&mut self, placed: &PlacedProfile);
}

/// Where the profile data of an import comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileSource {
    /// Raw profile file content, with an optional name to use in place of the header line
    Text { text: String, name: Option<String> },

    /// A row of the profile store, by name
    Stored(String),
}

/// Everything the user supplies for one import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRequest {
    pub source: ProfileSource,
    pub selection: ReferenceSelection,
    pub suffix: String,

    /// Name of an existing design parameter that should drive the chord length
    pub driving: Option<String>,

    /// Distance between the trailing edge points in world units
    pub tail_gap: f64,
}

impl ImportRequest {
    pub fn new(source: ProfileSource, suffix: &str) -> Self {
        Self {
            source,
            selection: ReferenceSelection::Origin,
            suffix: suffix.to_string(),
            driving: None,
            tail_gap: 0.0,
        }
    }
}

/// The profile of a request, loaded but not yet checked against the design.
#[derive(Debug, Clone)]
pub struct CollectedInputs {
    pub request: ImportRequest,
    pub profile: Profile,
    pub warning: Option<DegreeWarning>,
}

/// Inputs which passed validation against the design.
#[derive(Debug, Clone)]
pub struct ValidatedImport {
    pub inputs: CollectedInputs,

    /// Chord length taken from the driving parameter, if there is one
    pub driven_chord: Option<f64>,
}

/// The complete result of an import, as it is handed to the host.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub profile_name: String,
    pub orientation: Orientation,
    pub placed: PlacedProfile,
    pub parameters: ParameterSet,
    pub warning: Option<DegreeWarning>,
}

/// Load the profile of a request from its text or from the store.
///
/// # Arguments
///
/// * `request`: the import request
/// * `store`: the profile store, required for `ProfileSource::Stored`
/// * `config`: parser settings
///
/// returns: Result<CollectedInputs, ImportError>
pub fn collect_inputs(
    request: ImportRequest,
    store: Option<&AirfoilStore>,
    config: &ImportConfig,
) -> Result<CollectedInputs> {
    let (profile, warning) = match &request.source {
        ProfileSource::Text { text, name } => {
            let parsed = parse_with_policy(text, config.degree_policy, config.expected_degree)?;
            let mut profile = parsed.profile;
            if let Some(name) = name {
                profile.name = name.clone();
            }
            (profile, parsed.warning)
        }
        ProfileSource::Stored(name) => {
            let store = store.ok_or_else(|| {
                ImportError::StoreIo("no profile store is available".to_string())
            })?;
            (store.get_profile(name)?, None)
        }
    };

    Ok(CollectedInputs {
        request,
        profile,
        warning,
    })
}

/// Check the suffix and the driving parameter against the design.
pub fn validate<H: HostDesign>(
    inputs: CollectedInputs,
    host: &H,
    config: &ImportConfig,
) -> Result<ValidatedImport> {
    validate_suffix(&inputs.request.suffix)?;

    let driven_chord = match &inputs.request.driving {
        Some(name) => {
            let value = host
                .parameter_value(name)
                .ok_or_else(|| ImportError::UnknownParameter(name.clone()))?;
            Some(value * config.unit_factor)
        }
        None => None,
    };

    Ok(ValidatedImport {
        inputs,
        driven_chord,
    })
}

/// Resolve the orientation, place the profile and bind it to parameters.  Nothing is written to
/// the host; its parameter names are only read to reject a suffix that is already in use.
pub fn run_pipeline<H: HostDesign>(
    validated: ValidatedImport,
    host: &H,
    config: &ImportConfig,
) -> Result<ImportOutcome> {
    let ValidatedImport {
        inputs,
        driven_chord,
    } = validated;
    let request = &inputs.request;

    let orientation = resolve_selection(&request.selection, config.default_chord, config.tolerance)?;
    let options = TransformOptions {
        tail_gap: request.tail_gap,
        mirror_y: orientation.mirrored,
        scale_override: driven_chord,
    };
    let mut placed = transform(&inputs.profile, &orientation.frame, &options)?;

    // Without a tail point nothing fixes the chord length in the sketch
    let open_chord = matches!(
        request.selection,
        ReferenceSelection::Origin | ReferenceSelection::Nose(_)
    );
    let bind_options = BindOptions {
        suffix: &request.suffix,
        driving: request.driving.as_deref(),
        unit_factor: config.unit_factor,
        length_unit: &config.length_unit,
        chord_dimension: open_chord,
    };
    let parameters = bind(&placed, &placed.local, placed.chord, &bind_options, |name| {
        host.has_parameter(name)
    })?;
    if let Some(name) = &parameters.chord_dimension {
        placed.hints.push(PlacementHint::ChordDimension {
            name: name.clone(),
            nose: orientation.frame.origin,
            tail: orientation.frame.to_world(placed.chord, 0.0),
        });
    }

    log::info!(
        "Imported '{}' with suffix '{}' (chord {}, mirrored: {})",
        inputs.profile.name,
        request.suffix,
        placed.chord,
        placed.mirrored
    );

    Ok(ImportOutcome {
        profile_name: inputs.profile.name,
        orientation,
        placed,
        parameters,
        warning: inputs.warning,
    })
}

/// Commit an outcome to the host design.
pub fn apply_to_host<H: HostDesign>(outcome: &ImportOutcome, host: &mut H) {
    host.add_parameters(&outcome.parameters);
    host.place_curves(&outcome.placed);
}

/// Run all steps of an import against a host design.
///
/// # Arguments
///
/// * `request`: the profile source, reference selection and naming options
/// * `host`: the design which receives the parameters and curves
/// * `store`: the profile store, required when importing a stored profile
/// * `config`: pipeline settings
///
/// returns: Result<ImportOutcome, ImportError>
pub fn import<H: HostDesign>(
    request: ImportRequest,
    host: &mut H,
    store: Option<&AirfoilStore>,
    config: &ImportConfig,
) -> Result<ImportOutcome> {
    let inputs = collect_inputs(request, store, config)?;
    let validated = validate(inputs, host, config)?;
    let outcome = run_pipeline(validated, host, config)?;
    apply_to_host(&outcome, host);
    Ok(outcome)
}

/// A host design that keeps everything in memory, used by the command line tool and in tests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryDesign {
    pub parameters: BTreeMap<String, f64>,
    pub favorites: Vec<String>,
    pub imports: Vec<ParameterSet>,
    pub curves: Vec<PlacedProfile>,
}

impl MemoryDesign {
    /// Create or overwrite a plain parameter, such as a driving dimension
    pub fn set_parameter(&mut self, name: &str, value: f64) {
        self.parameters.insert(name.to_string(), value);
    }
}

impl HostDesign for MemoryDesign {
    fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    fn parameter_value(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }

    fn add_parameters(&mut self, parameters: &ParameterSet) {
        for p in parameters.iter() {
            self.parameters.insert(p.name.clone(), p.value);
            if p.favorite {
                self.favorites.push(p.name.clone());
            }
        }
        self.favorites
            .extend(parameters.external_favorites.iter().cloned());
        self.imports.push(parameters.clone());
    }

    fn place_curves(&mut self, placed: &PlacedProfile) {
        self.curves.push(placed.clone());
    }
}
