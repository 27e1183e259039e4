use geo::{Coord, LineString, Point};

/// The two geometry kinds a record may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeometryKind { Segment, Point }

impl GeometryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Segment => "LineString",
            GeometryKind::Point => "Point",
        }
    }
}

/// Record geometry, in a single projected CRS measured in meters.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordGeometry {
    Segment(LineString<f64>),
    Point(Point<f64>),
}

impl RecordGeometry {
    #[inline]
    pub fn kind(&self) -> GeometryKind {
        match self {
            RecordGeometry::Segment(_) => GeometryKind::Segment,
            RecordGeometry::Point(_) => GeometryKind::Point,
        }
    }
}

/// Optional exposure metrics carried by a record, each normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric { Heat, Ndvi, Aqi }

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Heat, Metric::Ndvi, Metric::Aqi];

    pub fn field(&self) -> &'static str {
        match self {
            Metric::Heat => "heat_norm",
            Metric::Ndvi => "ndvi_norm",
            Metric::Aqi => "aqi_norm",
        }
    }
}

/// A geo-referenced input record with its composite priority score.
/// Owned by the caller; aggregation only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityRecord {
    pub id: String,
    pub geometry: Option<RecordGeometry>,
    pub priority_score: f64,
    pub heat_norm: Option<f64>,
    pub ndvi_norm: Option<f64>,
    pub aqi_norm: Option<f64>,
    /// Why a geometry present in the source could not be read, if it
    /// could not. Reported as malformed rather than missing.
    pub geometry_issue: Option<String>,
}

impl PriorityRecord {
    pub fn new(id: impl Into<String>, geometry: Option<RecordGeometry>, priority_score: f64) -> Self {
        Self {
            id: id.into(),
            geometry,
            priority_score,
            heat_norm: None,
            ndvi_norm: None,
            aqi_norm: None,
            geometry_issue: None,
        }
    }

    /// Construct a road-segment record from a coordinate list.
    pub fn segment(id: impl Into<String>, coords: &[(f64, f64)], priority_score: f64) -> Self {
        let line = coords.iter().map(|&(x, y)| Coord { x, y }).collect::<LineString<f64>>();
        Self::new(id, Some(RecordGeometry::Segment(line)), priority_score)
    }

    /// Construct a point-sample record.
    pub fn point(id: impl Into<String>, x: f64, y: f64, priority_score: f64) -> Self {
        Self::new(id, Some(RecordGeometry::Point(Point::new(x, y))), priority_score)
    }

    pub fn with_heat(mut self, value: f64) -> Self { self.heat_norm = Some(value); self }
    pub fn with_ndvi(mut self, value: f64) -> Self { self.ndvi_norm = Some(value); self }
    pub fn with_aqi(mut self, value: f64) -> Self { self.aqi_norm = Some(value); self }

    /// A metric value usable for averaging. Values outside [0, 1], NaN
    /// included, read as absent.
    #[inline]
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.raw_metric(metric).filter(|value| (0.0..=1.0).contains(value))
    }

    /// Metrics the record carries that [`metric`](Self::metric) ignores.
    pub fn ignored_metrics(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().filter_map(|metric| {
            self.raw_metric(metric)
                .filter(|value| !(0.0..=1.0).contains(value))
                .map(|value| (metric, value))
        })
    }

    #[inline]
    fn raw_metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Heat => self.heat_norm,
            Metric::Ndvi => self.ndvi_norm,
            Metric::Aqi => self.aqi_norm,
        }
    }

    #[inline]
    pub fn as_segment(&self) -> Option<&LineString<f64>> {
        match &self.geometry {
            Some(RecordGeometry::Segment(line)) => Some(line),
            _ => None,
        }
    }

    #[inline]
    pub fn as_point(&self) -> Option<&Point<f64>> {
        match &self.geometry {
            Some(RecordGeometry::Point(point)) => Some(point),
            _ => None,
        }
    }
}
