use super::params::AB;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AtomDataError {
    #[error("charge table holds {charges} entries but energy-group table holds {groups}")]
    LengthMismatch { charges: usize, groups: usize },
    #[error("atom {atom} is assigned energy group {group}, but only {n_groups} groups exist")]
    GroupOutOfRange {
        atom: usize,
        group: usize,
        n_groups: usize,
    },
}

/// Per-atom data consumed by the 1-4 pair kernel: A/B partial charges and the
/// energy-group id used to route Coulomb/LJ tallies.
#[derive(Debug, Clone, Default)]
pub struct AtomData {
    pub charge: Vec<AB>,
    pub energy_group: Vec<usize>,
    pub n_energy_groups: usize,
}

impl AtomData {
    /// Uncharged atoms, all in a single energy group. Convenient for systems
    /// with no 1-4 pairs.
    pub fn uncharged(n_atoms: usize) -> Self {
        Self {
            charge: vec![AB::fixed(0.0); n_atoms],
            energy_group: vec![0; n_atoms],
            n_energy_groups: 1,
        }
    }

    pub fn n_atoms(&self) -> usize {
        self.charge.len()
    }

    /// Checks internal consistency once, at load time.
    pub fn validate(&self) -> Result<(), AtomDataError> {
        if self.charge.len() != self.energy_group.len() {
            return Err(AtomDataError::LengthMismatch {
                charges: self.charge.len(),
                groups: self.energy_group.len(),
            });
        }
        for (atom, &group) in self.energy_group.iter().enumerate() {
            if group >= self.n_energy_groups {
                return Err(AtomDataError::GroupOutOfRange {
                    atom,
                    group,
                    n_groups: self.n_energy_groups,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncharged_atoms_validate() {
        let atoms = AtomData::uncharged(4);
        assert_eq!(atoms.n_atoms(), 4);
        assert!(atoms.validate().is_ok());
    }

    #[test]
    fn mismatched_table_lengths_are_rejected() {
        let mut atoms = AtomData::uncharged(4);
        atoms.energy_group.pop();
        assert!(matches!(
            atoms.validate(),
            Err(AtomDataError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn out_of_range_energy_group_is_rejected() {
        let mut atoms = AtomData::uncharged(2);
        atoms.energy_group[1] = 3;
        assert!(matches!(
            atoms.validate(),
            Err(AtomDataError::GroupOutOfRange {
                atom: 1,
                group: 3,
                ..
            })
        ));
    }
}
