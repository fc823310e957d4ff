//! Floating point key wrappers.
//!
//! Any `Ord` type can key the index. Rust floats are only `PartialOrd`, so
//! these wrappers order them by IEEE 754 `totalOrder`: `-0.0` sorts before
//! `0.0` and NaNs sort after the infinities of their sign.

use paste::paste;
use std::cmp::Ordering;

macro_rules! total_order_float {
    ($($float:ident),* $(,)?) => {
        paste! {
            $(
                #[doc = "`" $float "` key with a total order."]
                #[derive(Debug, Clone, Copy, Default)]
                pub struct [<Ordered $float:upper>](pub $float);

                impl [<Ordered $float:upper>] {
                    /// The wrapped value.
                    pub fn get(self) -> $float {
                        self.0
                    }
                }

                impl From<$float> for [<Ordered $float:upper>] {
                    fn from(value: $float) -> Self {
                        Self(value)
                    }
                }

                impl PartialEq for [<Ordered $float:upper>] {
                    fn eq(&self, other: &Self) -> bool {
                        self.cmp(other) == Ordering::Equal
                    }
                }

                impl Eq for [<Ordered $float:upper>] {}

                impl PartialOrd for [<Ordered $float:upper>] {
                    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                        Some(self.cmp(other))
                    }
                }

                impl Ord for [<Ordered $float:upper>] {
                    fn cmp(&self, other: &Self) -> Ordering {
                        self.0.total_cmp(&other.0)
                    }
                }
            )*
        }
    };
}

total_order_float!(f32, f64);
