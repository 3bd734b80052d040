use crate::traits::*;

#[derive(Debug, Clone, PartialEq)]
pub struct WithPosition2D<T> {
    pub inner: T,
    pub position_2d: Option<[f64; 2]>,
}

impl<T> WithPosition2D<T> {
    pub fn new(inner: T, position_2d: Option<[f64; 2]>) -> Self {
        Self { inner, position_2d }
    }
}

impl<T> HasPosition2D for WithPosition2D<T> {
    fn position_2d(&self) -> Option<[f64; 2]> {
        self.position_2d
    }
    fn set_position_2d(&mut self, pos: Option<[f64; 2]>) {
        self.position_2d = pos;
    }
}

macro_rules! delegate_trait {
    ($wrapper:ident, $trait:ident, $method:ident, $ret:ty) => {
        impl<T: $trait> $trait for $wrapper<T> {
            fn $method(&self) -> $ret {
                self.inner.$method()
            }
        }
    };
}

delegate_trait!(WithPosition2D, HasAtomicNum, atomic_num, u8);
delegate_trait!(WithPosition2D, HasFormalCharge, formal_charge, i8);
delegate_trait!(WithPosition2D, HasIsotope, isotope, u16);
delegate_trait!(WithPosition2D, HasHydrogenCount, hydrogen_count, u8);
delegate_trait!(WithPosition2D, HasAromaticity, is_aromatic, bool);
