//! Built-in numeric function library and the [`Function`] trait every registry entry implements.

use crate::coercion;
use crate::error::FunctionError;
use crate::value::Value;

/// Value `decibel(0)` resolves to instead of negative infinity.
pub const DECIBEL_FLOOR: f64 = -144.0;

/// Trait for functions callable from parameter expressions
pub trait Function: Send + Sync {
    /// Name the function is registered and called under
    fn name(&self) -> &str;

    /// Exact number of arguments the function accepts
    fn arity(&self) -> usize;

    /// Compute the result. Only called with exactly [`arity`](Self::arity) arguments.
    fn call(&self, args: &[Value]) -> Result<f64, FunctionError>;

    /// Check arity, then call. Arity is validated before any argument is coerced.
    #[inline]
    fn invoke(&self, args: &[Value]) -> Result<f64, FunctionError> {
        if args.len() != self.arity() {
            return Err(FunctionError::Arity {
                function: self.name().to_string(),
                expected: self.arity(),
                actual: args.len(),
            });
        }
        self.call(args)
    }
}

/// Coerce exactly `N` arguments to numbers on behalf of `function`.
pub fn numeric_args<const N: usize>(
    function: &str,
    args: &[Value],
) -> Result<[f64; N], FunctionError> {
    if args.len() != N {
        return Err(FunctionError::Arity {
            function: function.to_string(),
            expected: N,
            actual: args.len(),
        });
    }
    let mut out = [0.0; N];
    for (i, (slot, arg)) in out.iter_mut().zip(args).enumerate() {
        *slot = coercion::to_number(arg).map_err(|kind| FunctionError::Coercion {
            function: function.to_string(),
            position: i + 1,
            kind,
        })?;
    }
    Ok(out)
}

type NumericFn = dyn Fn(&[f64]) -> Result<f64, FunctionError> + Send + Sync;

/// Host-provided function backed by a closure over already-coerced arguments.
pub struct FnFunction {
    name: String,
    arity: usize,
    func: Box<NumericFn>,
}

impl FnFunction {
    pub fn new<F>(name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&[f64]) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Box::new(func),
        }
    }
}

impl std::fmt::Debug for FnFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl Function for FnFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn call(&self, args: &[Value]) -> Result<f64, FunctionError> {
        let nums = coercion::to_numbers(args).map_err(|(position, kind)| {
            FunctionError::Coercion {
                function: self.name.clone(),
                position,
                kind,
            }
        })?;
        (self.func)(&nums)
    }
}

/// `linear(db)`: decibels to linear gain, `10^(db/20)`
#[derive(Debug, Clone)]
pub struct Linear;

impl Function for Linear {
    fn name(&self) -> &str {
        "linear"
    }

    fn arity(&self) -> usize {
        1
    }

    fn call(&self, args: &[Value]) -> Result<f64, FunctionError> {
        let [db] = numeric_args(self.name(), args)?;
        Ok(10f64.powf(db / 20.0))
    }
}

/// `decibel(x)`: linear gain to decibels, floored at [`DECIBEL_FLOOR`] for zero
#[derive(Debug, Clone)]
pub struct Decibel;

impl Function for Decibel {
    fn name(&self) -> &str {
        "decibel"
    }

    fn arity(&self) -> usize {
        1
    }

    fn call(&self, args: &[Value]) -> Result<f64, FunctionError> {
        let [x] = numeric_args(self.name(), args)?;
        if x == 0.0 {
            Ok(DECIBEL_FLOOR)
        } else {
            Ok(20.0 * x.log10())
        }
    }
}

#[derive(Debug, Clone)]
pub struct Min;

impl Function for Min {
    fn name(&self) -> &str {
        "min"
    }

    fn arity(&self) -> usize {
        2
    }

    fn call(&self, args: &[Value]) -> Result<f64, FunctionError> {
        let [a, b] = numeric_args(self.name(), args)?;
        Ok(a.min(b))
    }
}

#[derive(Debug, Clone)]
pub struct Max;

impl Function for Max {
    fn name(&self) -> &str {
        "max"
    }

    fn arity(&self) -> usize {
        2
    }

    fn call(&self, args: &[Value]) -> Result<f64, FunctionError> {
        let [a, b] = numeric_args(self.name(), args)?;
        Ok(a.max(b))
    }
}

#[derive(Debug, Clone)]
pub struct Abs;

impl Function for Abs {
    fn name(&self) -> &str {
        "abs"
    }

    fn arity(&self) -> usize {
        1
    }

    fn call(&self, args: &[Value]) -> Result<f64, FunctionError> {
        let [a] = numeric_args(self.name(), args)?;
        Ok(a.abs())
    }
}

/// `sqrt(a)`: negative input yields NaN rather than an error
#[derive(Debug, Clone)]
pub struct Sqrt;

impl Function for Sqrt {
    fn name(&self) -> &str {
        "sqrt"
    }

    fn arity(&self) -> usize {
        1
    }

    fn call(&self, args: &[Value]) -> Result<f64, FunctionError> {
        let [a] = numeric_args(self.name(), args)?;
        Ok(a.sqrt())
    }
}

#[derive(Debug, Clone)]
pub struct Pow;

impl Function for Pow {
    fn name(&self) -> &str {
        "pow"
    }

    fn arity(&self) -> usize {
        2
    }

    fn call(&self, args: &[Value]) -> Result<f64, FunctionError> {
        let [base, exp] = numeric_args(self.name(), args)?;
        Ok(base.powf(exp))
    }
}

/// `scale(val, oldMin, oldMax, newMin, newMax)`: linear rescale between two
/// ascending ranges. `val` must lie inside the source range.
#[derive(Debug, Clone)]
pub struct Scale;

impl Function for Scale {
    fn name(&self) -> &str {
        "scale"
    }

    fn arity(&self) -> usize {
        5
    }

    fn call(&self, args: &[Value]) -> Result<f64, FunctionError> {
        let [val, old_min, old_max, new_min, new_max] = numeric_args(self.name(), args)?;
        // Comparisons are negated so NaN bounds are rejected too.
        if !(old_min < old_max) {
            return Err(FunctionError::range(
                self.name(),
                format!("source range [{old_min}, {old_max}] is empty or inverted"),
            ));
        }
        if !(new_min < new_max) {
            return Err(FunctionError::range(
                self.name(),
                format!("target range [{new_min}, {new_max}] is empty or inverted"),
            ));
        }
        if !(old_min..=old_max).contains(&val) {
            return Err(FunctionError::range(
                self.name(),
                format!("{val} is outside [{old_min}, {old_max}]"),
            ));
        }
        Ok(new_min + (new_max - new_min) * (val - old_min) / (old_max - old_min))
    }
}

/// Every built-in, in registration order.
pub fn builtins() -> Vec<Box<dyn Function>> {
    vec![
        Box::new(Linear),
        Box::new(Decibel),
        Box::new(Min),
        Box::new(Max),
        Box::new(Abs),
        Box::new(Sqrt),
        Box::new(Pow),
        Box::new(Scale),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::ValueKind;

    fn nums(values: &[f64]) -> Vec<Value> {
        values.iter().copied().map(Value::Number).collect()
    }

    #[test]
    fn decibel_and_linear_are_inverse() {
        let db = Decibel.invoke(&nums(&[0.5])).unwrap();
        let lin = Linear.invoke(&[Value::Number(db)]).unwrap();
        assert!((lin - 0.5).abs() < 1e-12);
    }

    #[test]
    fn decibel_of_zero_is_floor() {
        assert_eq!(Decibel.invoke(&nums(&[0.0])).unwrap(), DECIBEL_FLOOR);
        assert_eq!(Linear.invoke(&nums(&[0.0])).unwrap(), 1.0);
    }

    #[test]
    fn arity_is_checked_before_coercion() {
        let err = Pow.invoke(&[Value::text("not a number")]).unwrap_err();
        assert_eq!(
            err,
            FunctionError::Arity {
                function: "pow".into(),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn coercion_failure_names_position() {
        let err = Max
            .invoke(&[Value::Number(1.0), Value::text("high")])
            .unwrap_err();
        assert_eq!(
            err,
            FunctionError::Coercion {
                function: "max".into(),
                position: 2,
                kind: ValueKind::Text
            }
        );
    }

    #[test]
    fn numeric_text_arguments_are_accepted() {
        let out = Min.invoke(&[Value::text("3"), Value::Number(7.0)]).unwrap();
        assert_eq!(out, 3.0);
    }

    #[test]
    fn sqrt_of_negative_is_nan() {
        assert!(Sqrt.invoke(&nums(&[-4.0])).unwrap().is_nan());
        assert_eq!(Sqrt.invoke(&nums(&[9.0])).unwrap(), 3.0);
    }

    #[test]
    fn scale_maps_midpoint() {
        assert_eq!(Scale.invoke(&nums(&[5.0, 0.0, 10.0, 0.0, 100.0])).unwrap(), 50.0);
        assert_eq!(Scale.invoke(&nums(&[10.0, 0.0, 10.0, -1.0, 1.0])).unwrap(), 1.0);
    }

    #[test]
    fn scale_rejects_inverted_and_out_of_domain() {
        for args in [
            [5.0, 0.0, 10.0, 100.0, 0.0],
            [5.0, 10.0, 0.0, 0.0, 100.0],
            [5.0, 0.0, 0.0, 0.0, 100.0],
            [15.0, 0.0, 10.0, 0.0, 100.0],
            [f64::NAN, 0.0, 10.0, 0.0, 100.0],
        ] {
            let err = Scale.invoke(&nums(&args)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range, "{args:?}");
        }
    }

    #[test]
    fn closure_functions_coerce_arguments() {
        let mid = FnFunction::new("mid", 2, |a| Ok((a[0] + a[1]) / 2.0));
        assert_eq!(mid.invoke(&[Value::text("2"), Value::Number(4.0)]).unwrap(), 3.0);
        assert_eq!(mid.invoke(&nums(&[1.0])).unwrap_err().kind(), ErrorKind::Arity);
    }
}
