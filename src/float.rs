// Copyright (C) 2020-2026 Andy Kurnia.

// floating point type used for collecting statistics.
pub trait StatFloat:
    num_traits::Float + Default + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static
{
    fn from_f64(v: f64) -> Self;
    fn as_f64(self) -> f64;
}

macro_rules! impl_stat_float {
    ($t:ty) => {
        impl StatFloat for $t {
            #[inline(always)]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline(always)]
            fn as_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_stat_float!(f32);
impl_stat_float!(f64);

// a value that can be displayed and also folded into statistics.
// Stat is the default statistics type: floats keep their own precision,
// everything else is tracked in f32. as_f64 must not round through Stat.
pub trait Observable: Copy + Default {
    type Stat: StatFloat;

    fn as_f64(self) -> f64;
}

macro_rules! impl_observable {
    ($stat:ty; $($t:ty),*) => {
        $(
            impl Observable for $t {
                type Stat = $stat;

                #[inline(always)]
                fn as_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_observable!(f32; f32);
impl_observable!(f64; f64);
impl_observable!(f32; i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// converts an observed value into any statistics type, not just its default.
#[inline(always)]
pub fn observe<T: Observable, F: StatFloat>(value: T) -> F {
    F::from_f64(value.as_f64())
}
