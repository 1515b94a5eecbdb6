//! Positional, time-ordered series container.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{SeriesError, SeriesResult};
use crate::point::{IndicatorPoint, SeriesPoint};

/// Ordered sequence of points with strictly ascending timestamps.
///
/// Indicators walk the series by position, so the container is a plain vector
/// rather than a keyed map. Dereferences to a slice for read access.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series<T> {
    points: Vec<T>,
}

impl<T> Default for Series<T> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}

impl<T: SeriesPoint> Series<T> {
    /// Builds a series, rejecting unordered timestamps and malformed points.
    pub fn new(points: Vec<T>) -> SeriesResult<Self> {
        validate(&points)?;
        Ok(Self { points })
    }

    /// Wraps points the caller already knows to be ordered and well formed.
    ///
    /// Only checked in debug builds.
    pub fn new_unchecked(points: Vec<T>) -> Self {
        debug_assert!(validate(&points).is_ok(), "series invariants violated");
        Self { points }
    }

    /// Empty series with room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Appends a point that must be later than the current last point.
    pub fn push(&mut self, point: T) -> SeriesResult<()> {
        let index = self.points.len();
        if !point.is_well_formed() {
            return Err(SeriesError::MalformedPoint { index });
        }
        if let Some(last) = self.points.last() {
            if point.time() <= last.time() {
                return Err(SeriesError::NonAscendingTime {
                    index,
                    time: point.time(),
                    previous: last.time(),
                });
            }
        }
        self.points.push(point);
        Ok(())
    }

    /// Replaces the point at `index`, keeping the ordering with its neighbours intact.
    pub fn replace_at(&mut self, index: usize, point: T) -> SeriesResult<T> {
        let len = self.points.len();
        if index >= len {
            return Err(SeriesError::IndexOutOfRange { index, len });
        }
        if !point.is_well_formed() {
            return Err(SeriesError::MalformedPoint { index });
        }
        if index > 0 {
            let previous = self.points[index - 1].time();
            if point.time() <= previous {
                return Err(SeriesError::NonAscendingTime {
                    index,
                    time: point.time(),
                    previous,
                });
            }
        }
        if let Some(next) = self.points.get(index + 1) {
            if point.time() >= next.time() {
                return Err(SeriesError::NonAscendingTime {
                    index: index + 1,
                    time: next.time(),
                    previous: point.time(),
                });
            }
        }
        Ok(std::mem::replace(&mut self.points[index], point))
    }

    /// Timestamps of every point, in order.
    pub fn times(&self) -> impl Iterator<Item = i64> + '_ {
        self.points.iter().map(SeriesPoint::time)
    }

    /// Unwraps the underlying vector.
    pub fn into_inner(self) -> Vec<T> {
        self.points
    }
}

impl<T: SeriesPoint + Clone> Series<T> {
    /// Keeps the points matching `predicate`; order is preserved.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&T) -> bool,
    {
        Self {
            points: self
                .points
                .iter()
                .filter(|point| predicate(*point))
                .cloned()
                .collect(),
        }
    }

    /// Merges two series by time. Incoming points replace existing ones at the same time.
    pub fn merge(&self, incoming: &Series<T>) -> Self {
        let mut merged = Vec::with_capacity(self.points.len() + incoming.points.len());
        let mut left = self.points.iter().peekable();
        let mut right = incoming.points.iter().peekable();
        loop {
            let order = match (left.peek(), right.peek()) {
                (Some(a), Some(b)) => a.time().cmp(&b.time()),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => break,
            };
            let next = match order {
                Ordering::Less => left.next(),
                Ordering::Equal => {
                    left.next();
                    right.next()
                }
                Ordering::Greater => right.next(),
            };
            if let Some(point) = next {
                merged.push(point.clone());
            }
        }
        Self { points: merged }
    }

    /// Most recent `count` points.
    pub fn tail(&self, count: usize) -> Self {
        let start = self.points.len().saturating_sub(count);
        Self {
            points: self.points[start..].to_vec(),
        }
    }
}

impl Series<IndicatorPoint> {
    /// Projects these points onto `axis` by matching timestamps.
    ///
    /// Axis times absent from `self` become empty points, so the result has
    /// exactly the axis length and time values.
    pub fn align_to<U: SeriesPoint>(&self, axis: &Series<U>) -> Series<IndicatorPoint> {
        let by_time: HashMap<i64, Option<f64>> =
            self.points.iter().map(|p| (p.time, p.value)).collect();
        let points = axis
            .times()
            .map(|time| IndicatorPoint::new(time, by_time.get(&time).copied().flatten()))
            .collect();
        Series { points }
    }

    /// Number of positions carrying a value.
    pub fn defined_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_defined()).count()
    }
}

impl<T> Deref for Series<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl<T: SeriesPoint> TryFrom<Vec<T>> for Series<T> {
    type Error = SeriesError;

    fn try_from(points: Vec<T>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl<'a, T> IntoIterator for &'a Series<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<'de, T> Deserialize<'de> for Series<T>
where
    T: Deserialize<'de> + SeriesPoint,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let points = Vec::<T>::deserialize(deserializer)?;
        Series::new(points).map_err(serde::de::Error::custom)
    }
}

fn validate<T: SeriesPoint>(points: &[T]) -> SeriesResult<()> {
    for (index, point) in points.iter().enumerate() {
        if !point.is_well_formed() {
            return Err(SeriesError::MalformedPoint { index });
        }
        if index > 0 {
            let previous = points[index - 1].time();
            if point.time() <= previous {
                return Err(SeriesError::NonAscendingTime {
                    index,
                    time: point.time(),
                    previous,
                });
            }
        }
    }
    Ok(())
}
