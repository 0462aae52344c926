use donutfield_common::MatcapPreset;
use std::sync::{Arc, PoisonError, RwLock};

/// Matcap material parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub matcap: MatcapPreset,
    /// Alpha in `[0, 1]`. Only takes effect when `transparent` is set.
    pub opacity: f32,
    pub visible: bool,
    pub transparent: bool,
}

impl Material {
    /// Opaque-by-default material using the given matcap.
    pub fn matcap(matcap: MatcapPreset) -> Self {
        Self {
            matcap,
            opacity: 1.0,
            visible: true,
            transparent: false,
        }
    }

    pub fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }

    /// Alpha the renderer should blend with.
    pub fn effective_opacity(&self) -> f32 {
        if self.transparent { self.opacity } else { 1.0 }
    }
}

/// Handle to a material shared by every mesh that renders with it.
///
/// Cloning the handle shares the same parameters; use
/// [`SharedMaterial::ptr_eq`] to check whether two meshes use one material.
#[derive(Debug, Clone)]
pub struct SharedMaterial(Arc<RwLock<Material>>);

impl SharedMaterial {
    pub fn new(material: Material) -> Self {
        Self(Arc::new(RwLock::new(material)))
    }

    /// Current parameters.
    pub fn get(&self) -> Material {
        *self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate the parameters in place. Opacity is clamped to `[0, 1]` afterwards.
    pub fn update(&self, f: impl FnOnce(&mut Material)) {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
        guard.opacity = guard.opacity.clamp(0.0, 1.0);
    }

    pub fn set_opacity(&self, opacity: f32) {
        self.update(|m| m.opacity = opacity);
    }

    pub fn set_visible(&self, visible: bool) {
        self.update(|m| m.visible = visible);
    }

    pub fn set_matcap(&self, matcap: MatcapPreset) {
        self.update(|m| m.matcap = matcap);
    }

    pub fn ptr_eq(&self, other: &SharedMaterial) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Stable address used to batch draws by material.
    pub fn key(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl From<Material> for SharedMaterial {
    fn from(material: Material) -> Self {
        Self::new(material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_parameters() {
        let a = SharedMaterial::new(Material::matcap(MatcapPreset::Clay));
        let b = a.clone();
        b.set_matcap(MatcapPreset::Slime);
        b.set_visible(false);
        assert_eq!(a.get().matcap, MatcapPreset::Slime);
        assert!(!a.get().visible);
        assert!(a.ptr_eq(&b));
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn separate_materials_are_independent() {
        let a = SharedMaterial::new(Material::matcap(MatcapPreset::Clay));
        let b = SharedMaterial::new(Material::matcap(MatcapPreset::Clay));
        a.set_opacity(0.2);
        assert_eq!(b.get().opacity, 1.0);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn opacity_is_clamped() {
        let m = SharedMaterial::new(Material::matcap(MatcapPreset::Taffy).transparent());
        m.set_opacity(3.0);
        assert_eq!(m.get().opacity, 1.0);
        m.set_opacity(-1.0);
        assert_eq!(m.get().opacity, 0.0);
    }

    #[test]
    fn opacity_needs_transparency() {
        let mut m = Material::matcap(MatcapPreset::Clay);
        m.opacity = 0.5;
        assert_eq!(m.effective_opacity(), 1.0);
        assert_eq!(m.transparent().effective_opacity(), 0.5);
    }
}
