//! Exact phases, stored as rational numbers of half-turns.

use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num::{FromPrimitive, One, Rational64, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

/// A phase in units of π, kept in the range (-1,1].
///
/// Arithmetic is exact. Every constructor and operator renormalises, so two
/// phases that denote the same angle always compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "(i64, i64)", from = "(i64, i64)")]
pub struct Phase {
    r: Rational64,
}

impl Phase {
    pub fn new(r: impl Into<Rational64>) -> Self {
        Phase { r: r.into() }.normalize()
    }

    pub fn to_rational(&self) -> Rational64 {
        self.r
    }

    /// Rounds a floating point number of half-turns to the nearest
    /// representable phase. Returns `None` for NaN or infinite input.
    pub fn from_f64(f: f64) -> Option<Self> {
        Rational64::from_f64(f).map(Phase::new)
    }

    pub fn to_f64(&self) -> f64 {
        self.r.to_f64().unwrap_or(0.0)
    }

    fn normalize(self) -> Phase {
        let denom = *self.r.denom();
        let num = *self.r.numer();
        if -denom < num && num <= denom {
            return self;
        }
        let mut num = num.rem_euclid(2 * denom);
        if num > denom {
            num -= 2 * denom;
        }
        Phase {
            r: Rational64::new(num, denom),
        }
    }

    /// 0 or π
    pub fn is_pauli(&self) -> bool {
        self.r.is_integer()
    }

    /// A multiple of π/2
    pub fn is_clifford(&self) -> bool {
        *self.r.denom() <= 2
    }

    /// ±π/2
    pub fn is_proper_clifford(&self) -> bool {
        *self.r.denom() == 2
    }

    /// An odd multiple of π/4
    pub fn is_t(&self) -> bool {
        *self.r.denom() == 4
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.r.is_zero() {
            write!(f, "0")
        } else if self.r.is_one() {
            write!(f, "π")
        } else if *self.r.numer() == 1 {
            write!(f, "π/{}", self.r.denom())
        } else if *self.r.numer() == -1 {
            write!(f, "-π/{}", self.r.denom())
        } else {
            write!(f, "{}π/{}", self.r.numer(), self.r.denom())
        }
    }
}

impl From<Rational64> for Phase {
    fn from(r: Rational64) -> Phase {
        Phase::new(r)
    }
}

impl From<i64> for Phase {
    fn from(i: i64) -> Phase {
        Phase::new(Rational64::from_integer(i))
    }
}

impl From<(i64, i64)> for Phase {
    fn from((n, d): (i64, i64)) -> Phase {
        Phase::new(Rational64::new(n, d))
    }
}

impl From<Phase> for (i64, i64) {
    fn from(p: Phase) -> (i64, i64) {
        (*p.r.numer(), *p.r.denom())
    }
}

impl From<Phase> for Rational64 {
    fn from(p: Phase) -> Rational64 {
        p.r
    }
}

impl Zero for Phase {
    fn zero() -> Self {
        Phase {
            r: Rational64::zero(),
        }
    }

    fn is_zero(&self) -> bool {
        self.r.is_zero()
    }
}

impl One for Phase {
    /// π
    fn one() -> Self {
        Phase {
            r: Rational64::one(),
        }
    }

    fn is_one(&self) -> bool {
        self.r.is_one()
    }
}

impl Neg for Phase {
    type Output = Phase;

    fn neg(self) -> Phase {
        Phase::new(-self.r)
    }
}

macro_rules! phase_op {
    ($tr:ident, $f:ident, $tra:ident, $fa:ident, $op:tt) => {
        impl $tr for Phase {
            type Output = Phase;

            fn $f(self, rhs: Phase) -> Phase {
                Phase::new(self.r $op rhs.r)
            }
        }

        impl $tra for Phase {
            fn $fa(&mut self, rhs: Phase) {
                *self = *self $op rhs;
            }
        }
    };
}

phase_op!(Add, add, AddAssign, add_assign, +);
phase_op!(Sub, sub, SubAssign, sub_assign, -);

phase_op!(Mul, mul, MulAssign, mul_assign, *);

impl Mul<i64> for Phase {
    type Output = Phase;

    fn mul(self, rhs: i64) -> Phase {
        Phase::new(self.r * rhs)
    }
}

impl MulAssign<i64> for Phase {
    fn mul_assign(&mut self, rhs: i64) {
        *self = *self * rhs;
    }
}

impl std::iter::Sum for Phase {
    fn sum<I: Iterator<Item = Phase>>(iter: I) -> Phase {
        iter.fold(Phase::zero(), |acc, p| acc + p)
    }
}
