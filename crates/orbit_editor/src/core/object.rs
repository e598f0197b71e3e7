//! Scene object records.

use orbit_math::{Aabb, Transform, Vec2, Vec3};

use super::ObjectId;

/// Primitive shape for editor-created geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    Plane,
}

impl ShapeType {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeType::Cube => "Cube",
            ShapeType::Sphere => "Sphere",
            ShapeType::Cylinder => "Cylinder",
            ShapeType::Cone => "Cone",
            ShapeType::Torus => "Torus",
            ShapeType::Plane => "Plane",
        }
    }
}

/// Kind-specific data. The core only needs local bounds from it.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectKind {
    Shape {
        shape: ShapeType,
        /// Full extents in local space
        size: Vec3,
        corner_radius: f32,
    },
    Text {
        text: String,
        font_size: f32,
        /// Layout box in local space (width, height)
        extent: Vec2,
    },
    Asset {
        source: String,
        /// Known once the asset bundle has loaded
        bounds: Option<Aabb>,
    },
}

impl ObjectKind {
    /// Unit-sized shape of the given type
    pub fn shape(shape: ShapeType) -> Self {
        let size = match shape {
            ShapeType::Plane => Vec3::new(1.0, 0.0, 1.0),
            _ => Vec3::ONE,
        };
        ObjectKind::Shape {
            shape,
            size,
            corner_radius: 0.0,
        }
    }

    /// Local-space bounds, or `None` while the geometry is unavailable.
    pub fn local_bounds(&self) -> Option<Aabb> {
        match self {
            ObjectKind::Shape { size, .. } => {
                Some(Aabb::from_center_half_extents(Vec3::ZERO, *size * 0.5))
            }
            ObjectKind::Text { extent, .. } => Some(Aabb::from_center_half_extents(
                Vec3::ZERO,
                Vec3::new(extent.x * 0.5, extent.y * 0.5, 0.0),
            )),
            ObjectKind::Asset { bounds, .. } => *bounds,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ObjectKind::Shape { shape, .. } => shape.name(),
            ObjectKind::Text { .. } => "Text",
            ObjectKind::Asset { .. } => "Asset",
        }
    }
}

/// The live scene representation of an object: what the renderer draws.
///
/// Its transform follows the committed one except during a manipulation,
/// when it carries the preview pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveObject {
    pub transform: Transform,
    pub bounds: Aabb,
}

/// A scene object with all its properties.
///
/// `transform` and `selected` are only changed through the `Document`, which
/// keeps the selected flag in step with the selection set.
#[derive(Clone, Debug)]
pub struct SceneObject {
    /// Unique identifier
    pub id: ObjectId,
    /// Display name
    pub name: String,
    /// Kind-specific data
    pub kind: ObjectKind,
    /// Display color
    pub color: Vec3,
    pub(crate) transform: Transform,
    pub(crate) selected: bool,
    pub(crate) live: Option<LiveObject>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            kind,
            color: Vec3::splat(0.8),
            transform: Transform::IDENTITY,
            selected: false,
            live: None,
        }
    }

    /// Unit-sized shape
    pub fn shape(name: impl Into<String>, shape: ShapeType) -> Self {
        Self::new(name, ObjectKind::shape(shape))
    }

    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = id;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Committed transform
    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Live representation, if the object has been instantiated
    pub fn live(&self) -> Option<&LiveObject> {
        self.live.as_ref()
    }

    pub fn is_materialized(&self) -> bool {
        self.live.is_some()
    }

    /// The pose currently on screen: the preview if live, else the committed one.
    pub fn display_transform(&self) -> Transform {
        self.live.map_or(self.transform, |live| live.transform)
    }

    /// Create or refresh the live representation from the kind's bounds.
    /// Returns false when the geometry is not available yet.
    pub(crate) fn instantiate(&mut self) -> bool {
        match self.kind.local_bounds() {
            Some(bounds) => {
                self.live = Some(LiveObject {
                    transform: self.transform,
                    bounds,
                });
                true
            }
            None => {
                self.live = None;
                false
            }
        }
    }
}
