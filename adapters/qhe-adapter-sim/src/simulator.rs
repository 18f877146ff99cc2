//! Simulator backend implementation.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use qhe_hal::{
    Backend, Capabilities, Counts, ExecutionResult, HalError, HalResult, Job, JobId, JobStatus,
    ValidationResult,
};
use qhe_ir::{Circuit, GateKind, Instruction, InstructionKind, Register};

use crate::statevector::Statevector;

/// Default qubit limit.
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local shot-by-shot statevector simulator.
///
/// Every shot replays the circuit from |0…0⟩ with mid-circuit measurement,
/// reset and classically conditioned gates. Counts are keyed Qiskit-style:
/// classical registers in reverse declaration order, space separated, each
/// most significant bit first. A circuit without classical bits is sampled
/// over all qubits at the end instead.
pub struct SimulatorBackend {
    capabilities: Capabilities,
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    rng: Mutex<StdRng>,
}

impl SimulatorBackend {
    /// Create a simulator with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self {
            capabilities: Capabilities::simulator(DEFAULT_MAX_QUBITS),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Use a fixed RNG seed so runs are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Change the qubit limit.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.capabilities.num_qubits = max_qubits;
        self
    }

    fn check(&self, circuit: &Circuit) -> Vec<String> {
        let mut reasons = vec![];
        if circuit.num_qubits() > self.capabilities.num_qubits as usize {
            reasons.push(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.capabilities.num_qubits
            ));
        }
        for inst in circuit.instructions() {
            if let Some(GateKind::Custom(g)) = inst.as_gate().map(|g| &g.kind) {
                reasons.push(format!("Custom gate '{}' cannot be simulated", g.name));
            }
        }
        reasons
    }

    /// Simulate synchronously.
    pub fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be positive".into()));
        }
        if let Some(reason) = self.check(circuit).into_iter().next() {
            return Err(if circuit.num_qubits() > self.capabilities.num_qubits as usize {
                HalError::CircuitTooLarge(reason)
            } else {
                HalError::InvalidCircuit(reason)
            });
        }

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(run_simulation(circuit, shots, &mut rng))
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the first instruction whose effect depends on randomness or on
/// classical memory. Everything before it is the same for every shot.
fn deterministic_prefix(instructions: &[Instruction]) -> usize {
    instructions
        .iter()
        .position(|i| i.is_measure() || i.is_reset() || i.condition().is_some())
        .unwrap_or(instructions.len())
}

fn apply(sv: &mut Statevector, inst: &Instruction, memory: &mut [bool], rng: &mut StdRng) {
    match &inst.kind {
        InstructionKind::Gate(gate) => {
            if let Some(cond) = gate.condition {
                if !memory[cond.clbit.index()] {
                    return;
                }
            }
            if let GateKind::Standard(g) = &gate.kind {
                let qubits: Vec<_> = inst.qubits.iter().map(|q| q.index()).collect();
                sv.apply_gate(g, &qubits);
            }
        }
        InstructionKind::Measure => {
            for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                memory[c.index()] = sv.measure(q.index(), rng.r#gen());
            }
        }
        InstructionKind::Reset => {
            for q in &inst.qubits {
                sv.reset(q.index(), rng.r#gen());
            }
        }
        InstructionKind::Barrier => {}
    }
}

/// Render classical memory as a Qiskit-style key.
fn memory_key(cregs: &[Register], memory: &[bool]) -> String {
    cregs
        .iter()
        .rev()
        .filter(|r| !r.is_empty())
        .map(|r| {
            r.ids()
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .map(|id| if memory[id as usize] { '1' } else { '0' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[instrument(skip(circuit, rng), fields(circuit = %circuit.name()))]
fn run_simulation(circuit: &Circuit, shots: u32, rng: &mut StdRng) -> ExecutionResult {
    let start = Instant::now();
    let num_qubits = circuit.num_qubits();
    let instructions = circuit.instructions();
    debug!(
        "Starting simulation: {} qubits, {} instructions, {} shots",
        num_qubits,
        instructions.len(),
        shots
    );

    let split = deterministic_prefix(instructions);
    let mut prefix = Statevector::new(num_qubits);
    let mut scratch = vec![false; circuit.num_clbits()];
    for inst in &instructions[..split] {
        apply(&mut prefix, inst, &mut scratch, rng);
    }

    let mut counts = Counts::new();
    for shot in 0..shots {
        let mut sv = prefix.clone();
        let mut memory = vec![false; circuit.num_clbits()];
        for inst in &instructions[split..] {
            apply(&mut sv, inst, &mut memory, rng);
        }

        let key = if memory.is_empty() {
            format!("{:0width$b}", sv.sample(rng.r#gen()), width = num_qubits)
        } else {
            memory_key(circuit.cregs(), &memory)
        };
        counts.insert(key, 1);

        if shot > 0 && shot % 1000 == 0 {
            debug!("Completed {} shots", shot);
        }
    }

    let elapsed = start.elapsed();
    debug!("Simulation completed in {:?}", elapsed);

    #[allow(clippy::cast_possible_truncation)]
    let elapsed_ms = elapsed.as_millis() as u64;
    ExecutionResult::new(counts, shots).with_execution_time(elapsed_ms)
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let reasons = self.check(circuit);
        Ok(if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        })
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        let job_id = JobId::new(Uuid::new_v4().to_string());
        let mut job = Job::new(job_id.clone(), shots, self.name());
        debug!("Submitted job: {}", job_id);

        job.transition(JobStatus::Running);
        let result = self.run(circuit, shots)?;
        job.transition(JobStatus::Completed);

        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                job_id.0.clone(),
                SimJob {
                    job,
                    result: Some(result),
                },
            );

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get(&job_id.0)
            .and_then(|j| j.result.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        match jobs.get_mut(&job_id.0) {
            Some(sim_job) => {
                sim_job.job.transition(JobStatus::Cancelled);
                Ok(())
            }
            None => Err(HalError::JobNotFound(job_id.0.clone())),
        }
    }
}
