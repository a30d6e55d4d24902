use crate::{
    enzyme::Enzyme,
    error::TypoError,
    operate::format_trace,
    replication::{self, Evolution, SiteRun},
    strand::Strand,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    error::Error,
    fmt,
    fs::File,
    io::Write,
    path::Path,
};

pub type StrandId = String;
pub type OpId = String;
pub type RunId = String;

/// Where `Apply` binds when no position is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BindingMode {
    #[default]
    FirstSite,
    AllSites,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParameters {
    pub max_pool_size: usize,
    pub record_traces: bool,
    pub binding: BindingMode,
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            max_pool_size: 10_000,
            record_traces: false,
            binding: BindingMode::FirstSite,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectState {
    pub strands: HashMap<StrandId, Strand>,
    #[serde(default)]
    pub parameters: EngineParameters,
}

impl ProjectState {
    pub fn load_from_path(path: &str) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path).map_err(|e| EngineError {
            code: ErrorCode::Io,
            message: format!("Could not read state file '{path}': {e}"),
        })?;
        serde_json::from_str(&text).map_err(|e| EngineError {
            code: ErrorCode::InvalidInput,
            message: format!("Could not parse state JSON '{path}': {e}"),
        })
    }

    pub fn save_to_path(&self, path: &str) -> Result<(), EngineError> {
        let text = serde_json::to_string_pretty(self).map_err(|e| EngineError {
            code: ErrorCode::Internal,
            message: format!("Could not serialize state: {e}"),
        })?;
        std::fs::write(path, text).map_err(|e| EngineError {
            code: ErrorCode::Io,
            message: format!("Could not write state file '{path}': {e}"),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operation {
    LoadStrand {
        sequence: String,
        as_id: Option<StrandId>,
    },
    LoadFile {
        path: String,
        as_prefix: Option<String>,
    },
    SaveFile {
        inputs: Vec<StrandId>,
        path: String,
    },
    Translate {
        input: StrandId,
    },
    Apply {
        input: StrandId,
        enzyme: Enzyme,
        position: Option<usize>,
        output_prefix: Option<String>,
    },
    Replicate {
        inputs: Vec<StrandId>,
        generations: usize,
        output_prefix: Option<String>,
    },
    RemoveStrand {
        input: StrandId,
    },
    SetParameter {
        name: String,
        value: serde_json::Value,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub run_id: RunId,
    pub ops: Vec<Operation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpResult {
    pub op_id: OpId,
    pub created_strand_ids: Vec<StrandId>,
    pub changed_strand_ids: Vec<StrandId>,
    pub warnings: Vec<String>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRecord {
    pub run_id: RunId,
    pub op: Operation,
    pub result: OpResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    Unsupported,
    Io,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineError {
    pub code: ErrorCode,
    pub message: String,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for EngineError {}

impl From<TypoError> for EngineError {
    fn from(err: TypoError) -> Self {
        EngineError {
            code: ErrorCode::InvalidInput,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    pub protocol_version: String,
    pub supported_operations: Vec<String>,
    pub supported_parameters: Vec<String>,
    pub deterministic_operation_log: bool,
}

pub trait Engine {
    fn apply(&mut self, op: Operation) -> Result<OpResult, EngineError>;
    fn apply_workflow(&mut self, wf: Workflow) -> Result<Vec<OpResult>, EngineError>;
    fn snapshot(&self) -> &ProjectState;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypoEngine {
    state: ProjectState,
    journal: Vec<OperationRecord>,
    op_counter: u64,
}

impl TypoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: ProjectState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &ProjectState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ProjectState {
        &mut self.state
    }

    pub fn capabilities() -> Capabilities {
        Capabilities {
            protocol_version: "v1".to_string(),
            supported_operations: vec![
                "LoadStrand".to_string(),
                "LoadFile".to_string(),
                "SaveFile".to_string(),
                "Translate".to_string(),
                "Apply".to_string(),
                "Replicate".to_string(),
                "RemoveStrand".to_string(),
                "SetParameter".to_string(),
            ],
            supported_parameters: vec![
                "max_pool_size".to_string(),
                "record_traces".to_string(),
                "binding".to_string(),
            ],
            deterministic_operation_log: true,
        }
    }

    pub fn operation_log(&self) -> &[OperationRecord] {
        &self.journal
    }

    fn next_op_id(&mut self) -> OpId {
        self.op_counter += 1;
        format!("op-{}", self.op_counter)
    }

    fn derive_strand_id(path: &str) -> StrandId {
        Path::new(path)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "strand".to_string())
    }

    fn unique_strand_id(&self, base: &str) -> StrandId {
        if !self.state.strands.contains_key(base) {
            return base.to_string();
        }
        let mut i = 2usize;
        loop {
            let candidate = format!("{base}_{i}");
            if !self.state.strands.contains_key(&candidate) {
                return candidate;
            }
            i += 1;
        }
    }

    fn strand(&self, id: &str) -> Result<&Strand, EngineError> {
        self.state.strands.get(id).ok_or_else(|| EngineError {
            code: ErrorCode::NotFound,
            message: format!("Strand '{id}' not found"),
        })
    }

    /// Stores `strands` as `{prefix}_1`, `{prefix}_2`, ... skipping ids in use.
    fn insert_products(&mut self, prefix: &str, strands: Vec<Strand>, result: &mut OpResult) {
        for (i, strand) in strands.into_iter().enumerate() {
            let id = self.unique_strand_id(&format!("{prefix}_{}", i + 1));
            self.state.strands.insert(id.clone(), strand);
            result.created_strand_ids.push(id);
        }
    }

    fn save_as_fasta(&self, inputs: &[StrandId], path: &str) -> Result<(), EngineError> {
        let mut file = File::create(path).map_err(|e| EngineError {
            code: ErrorCode::Io,
            message: format!("Could not create FASTA file '{path}': {e}"),
        })?;
        for id in inputs {
            let text = self.strand(id)?.to_string();
            writeln!(file, ">{}", id.replace(' ', "_")).map_err(|e| EngineError {
                code: ErrorCode::Io,
                message: format!("Could not write FASTA header to '{path}': {e}"),
            })?;
            for chunk in text.as_bytes().chunks(80) {
                file.write_all(chunk).map_err(|e| EngineError {
                    code: ErrorCode::Io,
                    message: format!("Could not write FASTA sequence to '{path}': {e}"),
                })?;
                file.write_all(b"\n").map_err(|e| EngineError {
                    code: ErrorCode::Io,
                    message: format!("Could not write FASTA newline to '{path}': {e}"),
                })?;
            }
        }
        Ok(())
    }

    fn site_runs(
        &self,
        enzyme: &Enzyme,
        strand: &Strand,
        position: Option<usize>,
    ) -> Result<Vec<SiteRun>, EngineError> {
        let with_trace = self.state.parameters.record_traces;
        if let Some(position) = position {
            if !strand.is_on_strand(position as isize) {
                return Err(TypoError::NotOnStrand {
                    position,
                    len: strand.len(),
                }
                .into());
            }
            return Ok(vec![replication::run_at(enzyme, strand, position, with_trace)]);
        }
        let mut runs = replication::run_at_binding_sites(enzyme, strand, with_trace);
        if self.state.parameters.binding == BindingMode::FirstSite {
            runs.truncate(1);
        }
        Ok(runs)
    }

    fn apply_internal(&mut self, op: Operation, run_id: &str) -> Result<OpResult, EngineError> {
        let op_id = self.next_op_id();
        tracing::info!(%op_id, run_id, ?op, "applying operation");
        let mut result = OpResult {
            op_id,
            created_strand_ids: vec![],
            changed_strand_ids: vec![],
            warnings: vec![],
            messages: vec![],
        };

        match op {
            Operation::LoadStrand { sequence, as_id } => {
                let strand = Strand::from_sequence(&sequence)?;
                let base = as_id.unwrap_or_else(|| "strand".to_string());
                let id = self.unique_strand_id(&base);
                result
                    .messages
                    .push(format!("Loaded {} bases as '{id}'", strand.len()));
                self.state.strands.insert(id.clone(), strand);
                result.created_strand_ids.push(id);
            }
            Operation::LoadFile { path, as_prefix } => {
                let records = Strand::from_fasta_file(&path).map_err(|e| EngineError {
                    code: ErrorCode::InvalidInput,
                    message: format!("Could not load FASTA file '{path}': {e}"),
                })?;
                if records.is_empty() {
                    result
                        .warnings
                        .push(format!("No sequences found in '{path}'"));
                }
                let prefix = as_prefix.unwrap_or_else(|| Self::derive_strand_id(&path));
                for (name, strand) in records {
                    let id = self.unique_strand_id(&format!("{prefix}_{name}"));
                    self.state.strands.insert(id.clone(), strand);
                    result.created_strand_ids.push(id);
                }
                result.messages.push(format!(
                    "Loaded {} strand(s) from '{path}'",
                    result.created_strand_ids.len()
                ));
            }
            Operation::SaveFile { inputs, path } => {
                self.save_as_fasta(&inputs, &path)?;
                result
                    .messages
                    .push(format!("Wrote {} strand(s) to '{path}'", inputs.len()));
            }
            Operation::Translate { input } => {
                let enzymes = self.strand(&input)?.enzymes();
                if enzymes.is_empty() {
                    result
                        .warnings
                        .push(format!("Strand '{input}' codes for no enzyme"));
                }
                for enzyme in enzymes {
                    let fold = enzyme.fold();
                    result.messages.push(format!(
                        "{enzyme} folds {} to {}, binds {}",
                        fold.first,
                        fold.last,
                        enzyme.preference()
                    ));
                }
            }
            Operation::Apply {
                input,
                enzyme,
                position,
                output_prefix,
            } => {
                let strand = self.strand(&input)?.clone();
                let runs = self.site_runs(&enzyme, &strand, position)?;
                if runs.is_empty() {
                    result.warnings.push(format!(
                        "{enzyme} finds no {} to bind to on '{input}'",
                        enzyme.preference()
                    ));
                }
                let prefix = output_prefix.unwrap_or_else(|| format!("{input}_product"));
                for run in runs {
                    result.messages.push(format!(
                        "{enzyme} at {} made {} product(s)",
                        run.position,
                        run.products.len()
                    ));
                    if !run.trace.is_empty() {
                        result.messages.extend(format_trace(&run.trace).lines().map(String::from));
                    }
                    let prefix = format!("{prefix}_at{}", run.position);
                    self.insert_products(&prefix, run.products, &mut result);
                }
            }
            Operation::Replicate {
                inputs,
                generations,
                output_prefix,
            } => {
                if inputs.is_empty() {
                    return Err(EngineError {
                        code: ErrorCode::InvalidInput,
                        message: "Replicate requires at least one input strand".to_string(),
                    });
                }
                let seed = inputs
                    .iter()
                    .map(|id| self.strand(id).cloned())
                    .collect::<Result<Vec<_>, _>>()?;
                let evolution =
                    Evolution::grow(seed, generations, self.state.parameters.max_pool_size)?;
                for (n, tally) in evolution.tallies().iter().enumerate().skip(1) {
                    let counts: Vec<String> = tally
                        .iter()
                        .map(|(strand, count)| format!("{strand}: {count}"))
                        .collect();
                    result
                        .messages
                        .push(format!("Generation {n}: {}", counts.join(", ")));
                }
                let prefix = output_prefix.unwrap_or_else(|| format!("gen{generations}"));
                let survivors = evolution.last().to_vec();
                if survivors.is_empty() {
                    result.warnings.push("The pool died out".to_string());
                }
                self.insert_products(&prefix, survivors, &mut result);
            }
            Operation::RemoveStrand { input } => {
                if self.state.strands.remove(&input).is_none() {
                    return Err(EngineError {
                        code: ErrorCode::NotFound,
                        message: format!("Strand '{input}' not found"),
                    });
                }
                result.changed_strand_ids.push(input.clone());
                result.messages.push(format!("Removed '{input}'"));
            }
            Operation::SetParameter { name, value } => {
                match name.as_str() {
                    "max_pool_size" => {
                        let raw = value.as_u64().ok_or_else(|| EngineError {
                            code: ErrorCode::InvalidInput,
                            message: "SetParameter max_pool_size requires a positive integer"
                                .to_string(),
                        })?;
                        if raw == 0 {
                            return Err(EngineError {
                                code: ErrorCode::InvalidInput,
                                message: "max_pool_size must be >= 1".to_string(),
                            });
                        }
                        self.state.parameters.max_pool_size = raw as usize;
                    }
                    "record_traces" => {
                        self.state.parameters.record_traces =
                            value.as_bool().ok_or_else(|| EngineError {
                                code: ErrorCode::InvalidInput,
                                message: "SetParameter record_traces requires a boolean"
                                    .to_string(),
                            })?;
                    }
                    "binding" => {
                        self.state.parameters.binding =
                            serde_json::from_value(value.clone()).map_err(|e| EngineError {
                                code: ErrorCode::InvalidInput,
                                message: format!(
                                    "SetParameter binding expects FirstSite or AllSites: {e}"
                                ),
                            })?;
                    }
                    _ => {
                        return Err(EngineError {
                            code: ErrorCode::Unsupported,
                            message: format!("Unknown parameter '{}'", name),
                        });
                    }
                }
                result
                    .messages
                    .push(format!("Set parameter '{}' to {}", name, value));
            }
        }

        Ok(result)
    }
}

impl Engine for TypoEngine {
    fn apply(&mut self, op: Operation) -> Result<OpResult, EngineError> {
        let run_id = "interactive".to_string();
        let result = self.apply_internal(op.clone(), &run_id)?;
        self.journal.push(OperationRecord {
            run_id,
            op,
            result: result.clone(),
        });
        Ok(result)
    }

    fn apply_workflow(&mut self, wf: Workflow) -> Result<Vec<OpResult>, EngineError> {
        let mut results = Vec::new();
        for op in &wf.ops {
            let result = self.apply_internal(op.clone(), &wf.run_id)?;
            self.journal.push(OperationRecord {
                run_id: wf.run_id.clone(),
                op: op.clone(),
                result: result.clone(),
            });
            results.push(result);
        }
        Ok(results)
    }

    fn snapshot(&self) -> &ProjectState {
        &self.state
    }
}
