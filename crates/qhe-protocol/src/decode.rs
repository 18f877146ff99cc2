//! Client-side decryption of measured outcomes.

use qhe_hal::Counts;

use crate::builder::ProtocolLayout;
use crate::error::{ProtocolError, ProtocolResult};

/// Widest outcome [`counts_to_probability_distribution`] expands into a
/// dense `2^n` vector. Matches the simulator's default qubit limit.
pub const MAX_DISTRIBUTION_WIDTH: usize = 24;

fn bit(c: char, outcome: &str) -> ProtocolResult<u8> {
    match c {
        '0' => Ok(0),
        '1' => Ok(1),
        other => Err(ProtocolError::malformed(
            outcome,
            format!("'{other}' is not a bit"),
        )),
    }
}

/// Undo the final X pad on the measured qubits.
///
/// `counts` must be in declaration order, as returned by
/// [`run_circuit`](qhe_hal::run_circuit) with `reverse = true`. Each key's
/// `circ` field is XORed bit by bit with the `x_key` bits of the measured
/// qubits; keys that decrypt to the same string are merged.
pub fn decrypt_counts(counts: &Counts, layout: &ProtocolLayout) -> ProtocolResult<Counts> {
    let Some(circ_field) = layout.circ_field else {
        return Err(ProtocolError::malformed(
            "",
            "the circuit was built without a final measurement",
        ));
    };

    let mut decrypted = Counts::new();
    for (outcome, &count) in counts {
        let fields: Vec<&str> = outcome.split(' ').collect();
        if fields.len() != layout.fields.len() {
            return Err(ProtocolError::malformed(
                outcome,
                format!(
                    "expected {} registers, found {}",
                    layout.fields.len(),
                    fields.len()
                ),
            ));
        }

        let key: Vec<char> = fields[layout.x_key_field].chars().collect();
        let value: Vec<char> = fields[circ_field].chars().collect();
        if key.len() != layout.data_qubits || value.len() != layout.measured_positions.len() {
            return Err(ProtocolError::malformed(
                outcome,
                "register widths do not match the layout",
            ));
        }

        let plain = value
            .iter()
            .zip(&layout.measured_positions)
            .map(|(&v, &position)| {
                let b = bit(v, outcome)? ^ bit(key[position], outcome)?;
                Ok(if b == 1 { '1' } else { '0' })
            })
            .collect::<ProtocolResult<String>>()?;
        decrypted.insert(plain, count);
    }

    Ok(decrypted)
}

/// Normalized histogram over all `2^n` outcomes of an `n`-bit register.
///
/// Outcomes are read as binary numbers with the leftmost character most
/// significant. Outcomes wider than [`MAX_DISTRIBUTION_WIDTH`] bits are
/// rejected as malformed.
pub fn counts_to_probability_distribution(counts: &Counts) -> ProtocolResult<Vec<f64>> {
    let Some((first, _)) = counts.iter().next() else {
        return Err(ProtocolError::EmptyCounts);
    };
    let width = first.len();
    if width > MAX_DISTRIBUTION_WIDTH {
        return Err(ProtocolError::malformed(
            first,
            format!("{width} bits exceeds the {MAX_DISTRIBUTION_WIDTH}-bit distribution limit"),
        ));
    }

    let mut distribution = vec![0.0; 1 << width];
    for (outcome, &count) in counts {
        if outcome.len() != width {
            return Err(ProtocolError::malformed(
                outcome,
                format!("expected {width} bits"),
            ));
        }
        let index = outcome
            .chars()
            .try_fold(0usize, |acc, c| Ok::<_, ProtocolError>((acc << 1) | bit(c, outcome)? as usize))?;
        distribution[index] += count as f64;
    }

    let total = counts.total() as f64;
    if total > 0.0 {
        for p in &mut distribution {
            *p /= total;
        }
    }
    Ok(distribution)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::allocator::AncillaPolicy;

    fn layout() -> ProtocolLayout {
        ProtocolLayout {
            policy: AncillaPolicy::Shared,
            data_qubits: 3,
            t_count: 0,
            fields: ["x_init_key", "z_init_key", "x_key", "z_key", "circ"]
                .map(String::from)
                .to_vec(),
            x_key_field: 2,
            circ_field: Some(4),
            measured_positions: vec![2, 0],
        }
    }

    #[test]
    fn test_decrypt_xors_key_positions() {
        let counts: Counts = [
            ("000 000 101 000 11".to_string(), 3),
            ("111 111 001 111 01".to_string(), 2),
            ("000 000 000 000 00".to_string(), 5),
        ]
        .into_iter()
        .collect();

        let plain = decrypt_counts(&counts, &layout()).unwrap();
        // 11 ^ (x[2], x[0]) = 11 ^ 11 = 00, 01 ^ (1, 0) = 11, 00 ^ 00 = 00.
        assert_eq!(plain.get("00"), 8);
        assert_eq!(plain.get("11"), 2);
        assert_eq!(plain.len(), 2);
    }

    #[test]
    fn test_decrypt_rejects_malformed() {
        let wrong_fields: Counts = [("000 000 101 11".to_string(), 1)].into_iter().collect();
        assert!(matches!(
            decrypt_counts(&wrong_fields, &layout()),
            Err(ProtocolError::MalformedOutcome { .. })
        ));

        let not_a_bit: Counts = [("000 000 1x1 000 11".to_string(), 1)].into_iter().collect();
        assert!(matches!(
            decrypt_counts(&not_a_bit, &layout()),
            Err(ProtocolError::MalformedOutcome { .. })
        ));

        let mut unmeasured = layout();
        unmeasured.circ_field = None;
        assert!(decrypt_counts(&Counts::new(), &unmeasured).is_err());
    }

    #[test]
    fn test_probability_distribution() {
        let counts: Counts = [("10".to_string(), 3), ("00".to_string(), 1)]
            .into_iter()
            .collect();
        let p = counts_to_probability_distribution(&counts).unwrap();
        assert_eq!(p, vec![0.25, 0.0, 0.75, 0.0]);
    }

    #[test]
    fn test_probability_distribution_edge_cases() {
        assert!(matches!(
            counts_to_probability_distribution(&Counts::new()),
            Err(ProtocolError::EmptyCounts)
        ));

        let ragged: Counts = [("1".to_string(), 1), ("01".to_string(), 1)]
            .into_iter()
            .collect();
        assert!(counts_to_probability_distribution(&ragged).is_err());
    }

    #[test]
    fn test_probability_distribution_width_limit() {
        for width in [MAX_DISTRIBUTION_WIDTH + 1, 40] {
            let too_wide: Counts = [("0".repeat(width), 1)].into_iter().collect();
            assert!(matches!(
                counts_to_probability_distribution(&too_wide),
                Err(ProtocolError::MalformedOutcome { .. })
            ));
        }
    }
}
