use std::fmt;
use std::ops;

pub mod index_map;
pub use index_map::VarMap;

/// A problem variable, 1-based; index 0 is the sentinel (see `local_search::state`).
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct Var(usize);

impl Var {
    #[inline]
    pub fn new(index: usize) -> Var {
        Var(index)
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }

    #[inline]
    pub fn lit(&self, sign: bool) -> Lit {
        Lit { var: *self, sign }
    }

    #[inline]
    pub fn pos_lit(&self) -> Lit {
        self.lit(false)
    }

    #[inline]
    pub fn neg_lit(&self) -> Lit {
        self.lit(true)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A literal: a variable plus the sense it appears with in a constraint term.
/// `sign() == true` means the variable appears negated.
#[derive(PartialEq, Eq, Copy, Clone, Hash)]
pub struct Lit {
    var: Var,
    sign: bool,
}

impl Lit {
    #[inline]
    pub fn sign(&self) -> bool {
        self.sign
    }

    #[inline]
    pub fn var(&self) -> Var {
        self.var
    }
}

impl ops::Not for Lit {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        Lit { var: self.var, sign: !self.sign }
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.sign {
            write!(f, "-")?;
        }
        write!(f, "{:?}", self.var)
    }
}
