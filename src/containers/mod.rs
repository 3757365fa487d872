//! The three statement containers (C5-C7) unified behind one enum so the
//! solver can hold them all in a single `(String, String) -> Container` map
//! instead of the source's per-kind global registries.

pub mod dynamic_list;
pub mod overlap_map;
pub mod static_list;

use dynamic_list::DynamicList;
use overlap_map::OverlapMap;
use static_list::StaticList;

use crate::statement::Statement;

pub enum Container {
    Dynamic(DynamicList),
    Static(StaticList),
    Overlap(OverlapMap),
}

impl Container {
    pub fn get_statements(&self) -> &[Statement] {
        match self {
            Container::Dynamic(list) => list.get_statements(),
            Container::Static(list) => list.get_statements(),
            Container::Overlap(map) => map.get_statements(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Container::Dynamic(list) => list.len(),
            Container::Static(list) => list.len(),
            Container::Overlap(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_dynamic_mut(&mut self) -> Option<&mut DynamicList> {
        match self {
            Container::Dynamic(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_overlap_mut(&mut self) -> Option<&mut OverlapMap> {
        match self {
            Container::Overlap(map) => Some(map),
            _ => None,
        }
    }

    /// Stage a raw statement, dispatching to whichever variant is actually
    /// mutable during transitive-cover construction. The target pair's
    /// container is a `DynamicList` when transitivity happens to produce a
    /// statement for the hypothesis pair itself - that's how the second
    /// `solve` phase gets its augmented evidence. A `StaticList` is built
    /// once and never staged into again.
    pub fn add(&mut self, statement: Option<Statement>) -> bool {
        match self {
            Container::Dynamic(list) => list.add(statement),
            Container::Overlap(map) => map.add(statement),
            Container::Static(_) => false,
        }
    }
}
