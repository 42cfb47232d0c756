use super::kind::InteractionKind;
use super::params::{
    HarmonicParams, MorseParams, Pair14Params, PeriodicDihedralParams, PositionRestraintParams,
    RbParams, WaterPolParams,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("{kind:?} instance {instance} references atom {atom}, but the system has {n_atoms}")]
    AtomIndexOutOfRange {
        kind: InteractionKind,
        instance: usize,
        atom: usize,
        n_atoms: usize,
    },
    #[error(
        "{kind:?} instance {instance} references parameter record {param}, \
         but the table holds {n_params}"
    )]
    ParamIndexOutOfRange {
        kind: InteractionKind,
        instance: usize,
        param: usize,
        n_params: usize,
    },
    #[error("proper dihedral parameter record {param} has multiplicity {multiplicity}; must be >= 1")]
    BadMultiplicity { param: usize, multiplicity: i32 },
}

/// One bonded instance: an ordered atom tuple plus a handle into the kind's
/// parameter table.
pub trait Instance {
    fn param(&self) -> usize;
    fn visit_atoms(&self, visit: &mut dyn FnMut(usize));
}

macro_rules! instance_record {
    ($(#[$doc:meta])* $name:ident { $($atom:ident),+ }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            $(pub $atom: usize,)+
            pub param: usize,
        }

        impl Instance for $name {
            fn param(&self) -> usize {
                self.param
            }

            fn visit_atoms(&self, visit: &mut dyn FnMut(usize)) {
                $(visit(self.$atom);)+
            }
        }
    };
}

instance_record!(
    /// Two-body instance: bonds and 1-4 pairs.
    BondInstance { ai, aj }
);
instance_record!(
    /// Three-body instance; `aj` is the vertex atom.
    AngleInstance { ai, aj, ak }
);
instance_record!(
    /// Four-body instance around the `aj`-`ak` axis.
    DihedralInstance { ai, aj, ak, al }
);
instance_record!(
    /// Single restrained atom.
    RestraintInstance { ai }
);
instance_record!(
    /// Water polarization site: oxygen, two hydrogens, dummy, shell. Only the
    /// dummy and the shell receive force; the first three supply the frame.
    WaterPolInstance {
        oxygen,
        h1,
        h2,
        dummy,
        shell
    }
);

/// One interaction kind's instances paired with its parameter table.
#[derive(Debug, Clone)]
pub struct KindTable<I, P> {
    pub instances: Vec<I>,
    pub params: Vec<P>,
}

impl<I, P> Default for KindTable<I, P> {
    fn default() -> Self {
        Self {
            instances: Vec::new(),
            params: Vec::new(),
        }
    }
}

impl<I: Instance, P> KindTable<I, P> {
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn validate(&self, kind: InteractionKind, n_atoms: usize) -> Result<(), TopologyError> {
        for (index, instance) in self.instances.iter().enumerate() {
            if instance.param() >= self.params.len() {
                return Err(TopologyError::ParamIndexOutOfRange {
                    kind,
                    instance: index,
                    param: instance.param(),
                    n_params: self.params.len(),
                });
            }
            let mut bad_atom = None;
            instance.visit_atoms(&mut |atom| {
                if atom >= n_atoms && bad_atom.is_none() {
                    bad_atom = Some(atom);
                }
            });
            if let Some(atom) = bad_atom {
                return Err(TopologyError::AtomIndexOutOfRange {
                    kind,
                    instance: index,
                    atom,
                    n_atoms,
                });
            }
        }
        Ok(())
    }
}

/// All bonded interaction tables of one topology. Built by an external loader,
/// validated once, then read-only for every force evaluation.
#[derive(Debug, Clone, Default)]
pub struct BondedTopology {
    pub harmonic_bonds: KindTable<BondInstance, HarmonicParams>,
    pub morse_bonds: KindTable<BondInstance, MorseParams>,
    pub g96_bonds: KindTable<BondInstance, HarmonicParams>,
    pub harmonic_angles: KindTable<AngleInstance, HarmonicParams>,
    pub g96_angles: KindTable<AngleInstance, HarmonicParams>,
    pub proper_dihedrals: KindTable<DihedralInstance, PeriodicDihedralParams>,
    pub improper_dihedrals: KindTable<DihedralInstance, HarmonicParams>,
    pub rb_dihedrals: KindTable<DihedralInstance, RbParams>,
    pub position_restraints: KindTable<RestraintInstance, PositionRestraintParams>,
    pub pairs_14: KindTable<BondInstance, Pair14Params>,
    pub water_polarization: KindTable<WaterPolInstance, WaterPolParams>,
}

impl BondedTopology {
    /// Number of instances registered for `kind`.
    pub fn instance_count(&self, kind: InteractionKind) -> usize {
        match kind {
            InteractionKind::HarmonicBond => self.harmonic_bonds.len(),
            InteractionKind::MorseBond => self.morse_bonds.len(),
            InteractionKind::G96Bond => self.g96_bonds.len(),
            InteractionKind::HarmonicAngle => self.harmonic_angles.len(),
            InteractionKind::G96Angle => self.g96_angles.len(),
            InteractionKind::ProperDihedral => self.proper_dihedrals.len(),
            InteractionKind::ImproperDihedral => self.improper_dihedrals.len(),
            InteractionKind::RyckaertBellemans => self.rb_dihedrals.len(),
            InteractionKind::PositionRestraint => self.position_restraints.len(),
            InteractionKind::Pair14 => self.pairs_14.len(),
            InteractionKind::WaterPolarization => self.water_polarization.len(),
        }
    }

    /// Validates every atom and parameter reference against the table sizes.
    ///
    /// Runs once after topology construction so that kernel traversal can
    /// index the tables without per-access checks.
    pub fn validate(&self, n_atoms: usize) -> Result<(), TopologyError> {
        self.harmonic_bonds
            .validate(InteractionKind::HarmonicBond, n_atoms)?;
        self.morse_bonds
            .validate(InteractionKind::MorseBond, n_atoms)?;
        self.g96_bonds.validate(InteractionKind::G96Bond, n_atoms)?;
        self.harmonic_angles
            .validate(InteractionKind::HarmonicAngle, n_atoms)?;
        self.g96_angles
            .validate(InteractionKind::G96Angle, n_atoms)?;
        self.proper_dihedrals
            .validate(InteractionKind::ProperDihedral, n_atoms)?;
        self.improper_dihedrals
            .validate(InteractionKind::ImproperDihedral, n_atoms)?;
        self.rb_dihedrals
            .validate(InteractionKind::RyckaertBellemans, n_atoms)?;
        self.position_restraints
            .validate(InteractionKind::PositionRestraint, n_atoms)?;
        self.pairs_14.validate(InteractionKind::Pair14, n_atoms)?;
        self.water_polarization
            .validate(InteractionKind::WaterPolarization, n_atoms)?;

        for (param, record) in self.proper_dihedrals.params.iter().enumerate() {
            if record.multiplicity < 1 {
                return Err(TopologyError::BadMultiplicity {
                    param,
                    multiplicity: record.multiplicity,
                });
            }
        }
        Ok(())
    }
}
