use std::{marker, ops};
use vec_map;
use super::Var;

pub type VarMap<V> = IdxMap<Var, V>;

pub trait Idx {
    fn idx(&self) -> usize;
    fn unidx(_: usize) -> Self;
}

impl Idx for Var {
    #[inline]
    fn idx(&self) -> usize {
        self.index()
    }

    #[inline]
    fn unidx(idx: usize) -> Var {
        Var::new(idx)
    }
}

/// A sparse map keyed by a dense-ish index type, backed by `vec_map`.
/// Used for the DIMACS external-id <-> internal-`Var` substitution tables.
pub struct IdxMap<K: Idx, V> {
    map: vec_map::VecMap<V>,
    ph: marker::PhantomData<K>,
}

impl<K: Idx, V> IdxMap<K, V> {
    pub fn new() -> Self {
        IdxMap {
            map: vec_map::VecMap::new(),
            ph: marker::PhantomData,
        }
    }

    #[inline]
    pub fn insert(&mut self, k: &K, v: V) -> Option<V> {
        self.map.insert(k.idx(), v)
    }

    #[inline]
    pub fn get(&self, k: &K) -> Option<&V> {
        self.map.get(k.idx())
    }

    #[inline]
    pub fn iter(&self) -> Iter<K, V> {
        Iter {
            it: self.map.iter(),
            ph: marker::PhantomData,
        }
    }
}

impl<K: Idx, V> Default for IdxMap<K, V> {
    fn default() -> Self {
        IdxMap::new()
    }
}

impl<'r, K: Idx, V> ops::Index<&'r K> for IdxMap<K, V> {
    type Output = V;

    #[inline]
    fn index(&self, k: &'r K) -> &V {
        self.map.index(&k.idx())
    }
}

pub struct Iter<'a, K: Idx, V: 'a> {
    it: vec_map::Iter<'a, V>,
    ph: marker::PhantomData<K>,
}

impl<'a, K: Idx, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<(K, &'a V)> {
        self.it.next().map(|(idx, v)| (Idx::unidx(idx), v))
    }
}
