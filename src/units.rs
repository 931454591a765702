// 📏 Units - the host model stores lengths in decimal feet

pub const MM_PER_FOOT: f64 = 304.8;

pub fn mm_to_feet(mm: f64) -> f64 {
    mm / MM_PER_FOOT
}

pub fn feet_to_mm(feet: f64) -> f64 {
    feet * MM_PER_FOOT
}
