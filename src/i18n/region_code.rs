pub struct RegionCode {
}

impl RegionCode {
    /// Returns a region code string representing the "unknown" region.
    pub fn get_unknown() -> &'static str {
        return Self::zz();
    }

    pub fn zz() -> &'static str {
        return "ZZ";    
    }

    /// Region code shared by all non-geographical entities (+800, +808, ...).
    pub fn un001() -> &'static str {
        return "001";
    }
}
