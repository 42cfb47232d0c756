use serde::Deserialize;

/// The closed set of bonded interaction kinds this core evaluates.
///
/// The discriminant order of [`InteractionKind::ALL`] fixes the deterministic
/// order in which the dispatch driver visits the per-kind tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum InteractionKind {
    HarmonicBond,
    MorseBond,
    G96Bond,
    HarmonicAngle,
    G96Angle,
    ProperDihedral,
    ImproperDihedral,
    RyckaertBellemans,
    PositionRestraint,
    Pair14,
    WaterPolarization,
}

impl InteractionKind {
    /// All kinds, in canonical dispatch order.
    pub const ALL: [InteractionKind; 11] = [
        InteractionKind::HarmonicBond,
        InteractionKind::MorseBond,
        InteractionKind::G96Bond,
        InteractionKind::HarmonicAngle,
        InteractionKind::G96Angle,
        InteractionKind::ProperDihedral,
        InteractionKind::ImproperDihedral,
        InteractionKind::RyckaertBellemans,
        InteractionKind::PositionRestraint,
        InteractionKind::Pair14,
        InteractionKind::WaterPolarization,
    ];

    /// Number of atoms one instance of this kind binds.
    pub const fn arity(&self) -> usize {
        match self {
            InteractionKind::HarmonicBond
            | InteractionKind::MorseBond
            | InteractionKind::G96Bond
            | InteractionKind::Pair14 => 2,
            InteractionKind::HarmonicAngle | InteractionKind::G96Angle => 3,
            InteractionKind::ProperDihedral
            | InteractionKind::ImproperDihedral
            | InteractionKind::RyckaertBellemans => 4,
            InteractionKind::PositionRestraint => 1,
            InteractionKind::WaterPolarization => 5,
        }
    }

    /// Stable index into per-kind accumulator arrays.
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Human-readable label for diagnostics and energy reports.
    pub const fn label(&self) -> &'static str {
        match self {
            InteractionKind::HarmonicBond => "Bond",
            InteractionKind::MorseBond => "Morse",
            InteractionKind::G96Bond => "G96Bond",
            InteractionKind::HarmonicAngle => "Angle",
            InteractionKind::G96Angle => "G96Angle",
            InteractionKind::ProperDihedral => "Proper Dih.",
            InteractionKind::ImproperDihedral => "Improper Dih.",
            InteractionKind::RyckaertBellemans => "Ryckaert-Bell.",
            InteractionKind::PositionRestraint => "Position Rest.",
            InteractionKind::Pair14 => "LJ-14",
            InteractionKind::WaterPolarization => "Water Pol.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_every_kind_exactly_once() {
        for (i, kind) in InteractionKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn arity_matches_atom_tuple_sizes() {
        assert_eq!(InteractionKind::HarmonicBond.arity(), 2);
        assert_eq!(InteractionKind::HarmonicAngle.arity(), 3);
        assert_eq!(InteractionKind::RyckaertBellemans.arity(), 4);
        assert_eq!(InteractionKind::PositionRestraint.arity(), 1);
        assert_eq!(InteractionKind::WaterPolarization.arity(), 5);
    }

    #[test]
    fn labels_are_unique() {
        let labels: Vec<_> = InteractionKind::ALL.iter().map(|k| k.label()).collect();
        let mut deduped = labels.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), labels.len());
    }
}
