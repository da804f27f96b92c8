//! Aggregates over chart series that may contain gaps.
//!
//! `None` and NaN entries are skipped. An empty or all-invalid input yields 0.

fn valid<I, V>(values: I) -> impl Iterator<Item = f64>
where
    I: IntoIterator<Item = V>,
    V: Into<Option<f64>>,
{
    values
        .into_iter()
        .filter_map(|v| Into::<Option<f64>>::into(v))
        .filter(|v| !v.is_nan())
}

pub fn safe_max<I, V>(values: I) -> f64
where
    I: IntoIterator<Item = V>,
    V: Into<Option<f64>>,
{
    valid(values).reduce(f64::max).unwrap_or(0.0)
}

pub fn safe_min<I, V>(values: I) -> f64
where
    I: IntoIterator<Item = V>,
    V: Into<Option<f64>>,
{
    valid(values).reduce(f64::min).unwrap_or(0.0)
}

pub fn safe_sum<I, V>(values: I) -> f64
where
    I: IntoIterator<Item = V>,
    V: Into<Option<f64>>,
{
    valid(values).sum()
}

pub fn safe_average<I, V>(values: I) -> f64
where
    I: IntoIterator<Item = V>,
    V: Into<Option<f64>>,
{
    let (sum, n) = valid(values).fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}
