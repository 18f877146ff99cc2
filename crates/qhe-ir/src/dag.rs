//! DAG view of a circuit's wire dependencies.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input node for a wire.
    In(WireId),
    /// Output node for a wire.
    Out(WireId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Check if this is an operation node.
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// Identifier for a wire in the DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

impl From<QubitId> for WireId {
    fn from(q: QubitId) -> Self {
        WireId::Qubit(q)
    }
}

impl From<ClbitId> for WireId {
    fn from(c: ClbitId) -> Self {
        WireId::Clbit(c)
    }
}

/// An edge in the circuit DAG representing a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge represents.
    pub wire: WireId,
}

/// DAG-based dependency graph.
///
/// - Nodes are either input nodes, output nodes, or operation nodes
/// - Edges represent wires (quantum or classical)
/// - A classically conditioned gate sits on its condition bit's wire, so it
///   is ordered after the measurement that writes that bit
///
/// The `wire_front` index maps each wire to the node just before its output
/// node, which keeps `apply()` O(operands). Layer depth is tracked the same
/// way, per wire, as operations are appended.
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    graph: DiGraph<DagNode, DagEdge, u32>,
    inputs: FxHashMap<WireId, NodeIndex>,
    outputs: FxHashMap<WireId, NodeIndex>,
    wire_front: FxHashMap<WireId, NodeIndex>,
    wire_depth: FxHashMap<WireId, usize>,
    depth: usize,
    num_qubits: usize,
    num_clbits: usize,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self::default()
    }

    fn add_wire(&mut self, wire: WireId) -> bool {
        if self.inputs.contains_key(&wire) {
            return false;
        }
        let in_node = self.graph.add_node(DagNode::In(wire));
        let out_node = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(in_node, out_node, DagEdge { wire });
        self.inputs.insert(wire, in_node);
        self.outputs.insert(wire, out_node);
        self.wire_front.insert(wire, in_node);
        self.wire_depth.insert(wire, 0);
        true
    }

    /// Add a qubit wire.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.add_wire(WireId::Qubit(qubit)) {
            self.num_qubits += 1;
        }
    }

    /// Add a classical wire.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if self.add_wire(WireId::Clbit(clbit)) {
            self.num_clbits += 1;
        }
    }

    /// Check an instruction against the wires of this DAG without applying it.
    #[allow(clippy::cast_possible_truncation)]
    pub fn validate(&self, instruction: &Instruction) -> IrResult<Vec<WireId>> {
        let gate_name = match &instruction.kind {
            InstructionKind::Gate(gate) => Some(gate.name().to_string()),
            _ => None,
        };

        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let expected = gate.num_qubits() as usize;
                let got = instruction.qubits.len();
                if expected != got {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate.name().to_string(),
                        expected: expected as u32,
                        got: got as u32,
                    });
                }
            }
            InstructionKind::Measure => {
                if instruction.qubits.len() != instruction.clbits.len() {
                    return Err(IrError::MeasureArity {
                        qubits: instruction.qubits.len(),
                        clbits: instruction.clbits.len(),
                    });
                }
            }
            InstructionKind::Reset | InstructionKind::Barrier => {}
        }

        let mut wires = Vec::with_capacity(instruction.qubits.len() + instruction.clbits.len() + 1);
        let mut seen = FxHashSet::default();

        for &qubit in &instruction.qubits {
            if !self.inputs.contains_key(&WireId::Qubit(qubit)) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
            if !seen.insert(WireId::Qubit(qubit)) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
            wires.push(WireId::Qubit(qubit));
        }

        for &clbit in &instruction.clbits {
            if !self.inputs.contains_key(&WireId::Clbit(clbit)) {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name.clone(),
                });
            }
            if !seen.insert(WireId::Clbit(clbit)) {
                return Err(IrError::DuplicateClbit {
                    clbit,
                    gate_name: gate_name.clone(),
                });
            }
            wires.push(WireId::Clbit(clbit));
        }

        if let Some(cond) = instruction.condition() {
            let wire = WireId::Clbit(cond.clbit);
            if !self.inputs.contains_key(&wire) {
                return Err(IrError::ClbitNotFound {
                    clbit: cond.clbit,
                    gate_name,
                });
            }
            if seen.insert(wire) {
                wires.push(wire);
            }
        }

        Ok(wires)
    }

    /// Append an instruction at the end of every wire it touches.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let wires = self.validate(&instruction)?;
        let op_node = self.graph.add_node(DagNode::Op(instruction));

        let mut layer = 0usize;
        for wire in wires {
            let out_node = self.outputs[&wire];
            let prev_node = self.wire_front[&wire];

            let eid = self
                .graph
                .edges_directed(prev_node, Direction::Outgoing)
                .find(|e| e.weight().wire == wire && e.target() == out_node)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!(
                        "Missing edge from predecessor to output for wire {wire:?}"
                    ))
                })?;
            self.graph.remove_edge(eid);
            self.graph.add_edge(prev_node, op_node, DagEdge { wire });
            self.graph.add_edge(op_node, out_node, DagEdge { wire });
            self.wire_front.insert(wire, op_node);

            layer = layer.max(self.wire_depth[&wire]);
        }

        // All touched wires advance to the same layer.
        let layer = layer + 1;
        for edge in self.graph.edges_directed(op_node, Direction::Outgoing) {
            self.wire_depth.insert(edge.weight().wire, layer);
        }
        self.depth = self.depth.max(layer);

        Ok(op_node)
    }

    /// Operations in a topological order.
    pub fn topological_ops(&self) -> IrResult<Vec<(NodeIndex, &Instruction)>> {
        let sorted = petgraph::algo::toposort(&self.graph, None)
            .map_err(|_| IrError::InvalidDag("cycle detected in circuit graph".into()))?;
        Ok(sorted
            .into_iter()
            .filter_map(|idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
            .collect())
    }

    /// Operations that must run before `node`, one per incoming wire.
    pub fn predecessors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .map(|e| e.source())
            .filter(|&src| self.graph[src].is_op())
            .collect()
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }

    /// Get the number of qubit wires.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the number of classical wires.
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Get the number of operations.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph.node_count().saturating_sub(2 * self.inputs.len())
    }

    /// Longest chain of operations along any sequence of shared wires.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }

    /// Verify the structural integrity of the DAG.
    ///
    /// Checks that the graph is acyclic and that every wire forms an
    /// unbroken path from its In node to its Out node.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("Graph contains a cycle".into()));
        }

        let max_steps = self.graph.node_count();
        for (&wire, &in_node) in &self.inputs {
            let out_node = self
                .outputs
                .get(&wire)
                .copied()
                .ok_or_else(|| IrError::InvalidDag(format!("Wire {wire:?} has no Out node")))?;

            let mut current = in_node;
            let mut steps = 0;
            while current != out_node {
                current = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .find(|e| e.weight().wire == wire)
                    .map(|e| e.target())
                    .ok_or_else(|| {
                        IrError::InvalidDag(format!(
                            "Wire {wire:?} is broken: no outgoing edge from node {current:?}"
                        ))
                    })?;
                steps += 1;
                if steps > max_steps {
                    return Err(IrError::InvalidDag(format!(
                        "Wire {wire:?} has too many steps"
                    )));
                }
            }
        }

        Ok(())
    }
}
