use std::collections::{BTreeSet, HashSet};

use glam::Vec3;

/// A named directional input. Pairs combine into diagonals, giving eight
/// headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoveInput {
    Up,
    Down,
    Left,
    Right,
}

impl MoveInput {
    pub const ALL: [MoveInput; 4] = [
        MoveInput::Up,
        MoveInput::Down,
        MoveInput::Left,
        MoveInput::Right,
    ];
}

impl std::str::FromStr for MoveInput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(MoveInput::Up),
            "down" => Ok(MoveInput::Down),
            "left" => Ok(MoveInput::Left),
            "right" => Ok(MoveInput::Right),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

/// Physical keys the desktop shell forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
}

/// Static mapping from keys to inputs and from inputs to unit vectors.
///
/// Vectors are normalized when the table is built; lookups never allocate.
#[derive(Debug, Clone)]
pub struct BindingTable {
    keys: Vec<(InputKey, MoveInput)>,
    vectors: [Vec3; 4],
}

impl BindingTable {
    /// Isometric camera bindings: "up" travels toward -X/-Z.
    pub fn isometric() -> Self {
        Self::new(
            vec![
                (InputKey::ArrowUp, MoveInput::Up),
                (InputKey::ArrowDown, MoveInput::Down),
                (InputKey::ArrowLeft, MoveInput::Left),
                (InputKey::ArrowRight, MoveInput::Right),
                (InputKey::W, MoveInput::Up),
                (InputKey::S, MoveInput::Down),
                (InputKey::A, MoveInput::Left),
                (InputKey::D, MoveInput::Right),
            ],
            [
                Vec3::new(-1.0, 0.0, -1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(-1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, -1.0),
            ],
        )
    }

    /// `directions` is indexed in [`MoveInput::ALL`] order. Zero vectors
    /// stay zero.
    pub fn new(keys: Vec<(InputKey, MoveInput)>, directions: [Vec3; 4]) -> Self {
        Self {
            keys,
            vectors: directions.map(Vec3::normalize_or_zero),
        }
    }

    pub fn input_for(&self, key: InputKey) -> Option<MoveInput> {
        self.keys
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, input)| *input)
    }

    pub fn vector(&self, input: MoveInput) -> Vec3 {
        self.vectors[input as usize]
    }
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::isometric()
    }
}

/// Keys currently held, resolved each tick into the active input set.
#[derive(Debug, Clone, Default)]
pub struct ActiveInputs {
    held: HashSet<InputKey>,
    direct: BTreeSet<MoveInput>,
}

impl ActiveInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an active set straight from named inputs, bypassing keys.
    pub fn from_inputs(inputs: impl IntoIterator<Item = MoveInput>) -> Self {
        Self {
            held: HashSet::new(),
            direct: inputs.into_iter().collect(),
        }
    }

    pub fn press(&mut self, key: InputKey) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: InputKey) {
        self.held.remove(&key);
    }

    /// Deduplicated set of active inputs. Two keys bound to the same input
    /// count once.
    pub fn resolve(&self, table: &BindingTable) -> BTreeSet<MoveInput> {
        self.held
            .iter()
            .filter_map(|key| table.input_for(*key))
            .chain(self.direct.iter().copied())
            .collect()
    }

    /// Unit vectors of the active inputs.
    pub fn directions(&self, table: &BindingTable) -> Vec<Vec3> {
        self.resolve(table)
            .into_iter()
            .map(|input| table.vector(input))
            .collect()
    }

    pub fn is_idle(&self) -> bool {
        self.held.is_empty() && self.direct.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isometric_vectors_are_unit_length() {
        let table = BindingTable::isometric();
        for input in MoveInput::ALL {
            assert!((table.vector(input).length() - 1.0).abs() < 1e-6);
            assert_eq!(table.vector(input).y, 0.0);
        }
        let up = table.vector(MoveInput::Up);
        assert!(up.x < 0.0 && up.z < 0.0);
    }

    #[test]
    fn arrows_and_wasd_bind_the_same_inputs() {
        let table = BindingTable::default();
        assert_eq!(table.input_for(InputKey::ArrowUp), Some(MoveInput::Up));
        assert_eq!(table.input_for(InputKey::W), Some(MoveInput::Up));
        assert_eq!(table.input_for(InputKey::A), Some(MoveInput::Left));
        assert_eq!(
            table.input_for(InputKey::ArrowRight),
            Some(MoveInput::Right)
        );
    }

    #[test]
    fn duplicate_keys_count_once() {
        let table = BindingTable::default();
        let mut active = ActiveInputs::new();
        active.press(InputKey::W);
        active.press(InputKey::ArrowUp);
        active.press(InputKey::D);
        let dirs = active.directions(&table);
        assert_eq!(dirs.len(), 2);
    }

    #[test]
    fn release_removes_key() {
        let table = BindingTable::default();
        let mut active = ActiveInputs::new();
        active.press(InputKey::S);
        active.release(InputKey::S);
        assert!(active.resolve(&table).is_empty());
        assert!(active.is_idle());
    }

    #[test]
    fn named_inputs_bypass_keys() {
        let table = BindingTable::default();
        let active = ActiveInputs::from_inputs([MoveInput::Left, MoveInput::Left, MoveInput::Down]);
        assert_eq!(
            active.resolve(&table).into_iter().collect::<Vec<_>>(),
            vec![MoveInput::Down, MoveInput::Left]
        );
    }

    #[test]
    fn unbound_key_is_ignored() {
        let table = BindingTable::new(vec![(InputKey::W, MoveInput::Up)], [Vec3::Z; 4]);
        let mut active = ActiveInputs::new();
        active.press(InputKey::ArrowUp);
        assert!(active.directions(&table).is_empty());
    }

    #[test]
    fn move_input_parses() {
        assert_eq!(" Up ".parse::<MoveInput>(), Ok(MoveInput::Up));
        assert_eq!("right".parse::<MoveInput>(), Ok(MoveInput::Right));
        assert!("forward".parse::<MoveInput>().is_err());
    }
}
