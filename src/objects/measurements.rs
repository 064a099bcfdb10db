//! Dimension tables for every primitive piece of the scene

use nightstreet_core::Geometry;

/// Box extents
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxSize {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl BoxSize {
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self { width, height, depth }
    }

    pub const fn cube(size: f32) -> Self {
        Self::new(size, size, size)
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::cuboid(self.width, self.height, self.depth)
    }
}

/// Plane extents
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneSize {
    pub width: f32,
    pub height: f32,
}

impl PlaneSize {
    pub fn geometry(&self) -> Geometry {
        Geometry::plane(self.width, self.height)
    }
}

/// Truncated cone along Y
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CylinderSize {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
}

impl CylinderSize {
    pub const fn new(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        Self {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        }
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::cylinder(self.radius_top, self.radius_bottom, self.height, self.radial_segments)
    }
}

pub const GRASS: PlaneSize = PlaneSize {
    width: 15.0,
    height: 15.0,
};

#[derive(Clone, Copy, Debug)]
pub struct ChairMeasurements {
    pub leg: BoxSize,
    pub seat: BoxSize,
    pub back_post: BoxSize,
    pub backrest: BoxSize,
    /// Drop of the backrest below the top of the posts
    pub backrest_inset: f32,
    /// Seat scale on X and Z
    pub seat_overhang: f32,
    pub backrest_scale_x: f32,
    pub offset_z: f32,
}

impl ChairMeasurements {
    /// Legs, seat and posts stacked
    pub fn height(&self) -> f32 {
        self.leg.height + self.seat.height + self.back_post.height
    }
}

pub const CHAIR: ChairMeasurements = ChairMeasurements {
    leg: BoxSize::new(0.04, 0.3, 0.04),
    seat: BoxSize::new(1.0, 0.06, 0.35),
    back_post: BoxSize::new(0.04, 0.4, 0.04),
    backrest: BoxSize::new(1.0, 0.2, 0.03),
    backrest_inset: 0.02,
    seat_overhang: 1.02,
    backrest_scale_x: 1.1,
    offset_z: -0.5,
};

#[derive(Clone, Copy, Debug)]
pub struct StreetMeasurements {
    pub asphalt: BoxSize,
    pub curb: BoxSize,
    pub sidewalk: BoxSize,
    pub road_marking: PlaneSize,
    /// X distance between neighboring road markings
    pub marking_spacing: f32,
    /// Height of the markings above the asphalt surface
    pub marking_lift: f32,
}

pub const STREET: StreetMeasurements = StreetMeasurements {
    asphalt: BoxSize::new(GRASS.width, 0.05, 5.0),
    curb: BoxSize::new(GRASS.width, 0.08, 0.1),
    sidewalk: BoxSize::new(GRASS.width, 0.06, 2.0),
    road_marking: PlaneSize {
        width: 1.4,
        height: 0.185,
    },
    marking_spacing: 5.0,
    marking_lift: 0.01,
};

#[derive(Clone, Copy, Debug)]
pub struct StreetLightMeasurements {
    pub foundation: CylinderSize,
    pub base: CylinderSize,
    pub pole: CylinderSize,
    pub pole_cap: BoxSize,
    pub lamp_base: CylinderSize,
    pub lamp: CylinderSize,
    pub roof_base: CylinderSize,
    pub roof_peak: CylinderSize,
    pub finial: BoxSize,
    /// Point light offset from the lamp center
    pub light_offset: [f32; 3],
}

pub const STREET_LIGHT: StreetLightMeasurements = StreetLightMeasurements {
    foundation: CylinderSize::new(0.15, 0.2, 0.1, 8),
    base: CylinderSize::new(0.05, 0.1, 0.5, 8),
    pole: CylinderSize::new(0.04, 0.04, 1.5, 8),
    pole_cap: BoxSize::new(0.09, 0.08, 0.09),
    lamp_base: CylinderSize::new(0.1, 0.05, 0.06, 6),
    lamp: CylinderSize::new(0.125, 0.1, 0.235, 6),
    roof_base: CylinderSize::new(0.125, 0.165, 0.0425, 8),
    roof_peak: CylinderSize::new(0.01, 0.1, 0.165, 6),
    finial: BoxSize::cube(0.035),
    light_offset: [-0.1, -0.25, 0.1],
};

pub const FIREFLY: BoxSize = BoxSize::cube(0.0085);
