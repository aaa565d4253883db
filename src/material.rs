//! Material factory: boxed uniform cells, composed materials, and the
//! pre-compile hook.
//!
//! A [`MaterialType`] is the Rust rendition of "derive a new material class
//! from a base": it pairs a base [`ShaderTemplate`] with declared inputs and
//! a collected [`AssemblyState`]. [`MaterialType::instantiate`] produces a
//! [`ComposedMaterial`] whose uniform values live in [`UniformCell`]s shared
//! by identity with the program's uniform table — writing a value through
//! the accessor updates the bound value without recompiling anything.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{Result, anyhow};

use crate::compose::{
    AssemblyState, CompiledProgram, FragmentContribution, ProgramCache, ShaderTemplate,
    UniformValue, Uniforms, Varyings, collect,
};

/// A single mutable holder for a uniform value.
///
/// Cloning the cell clones the handle, not the value: the material accessor
/// and the program's uniform table observe the same cell.
#[derive(Clone, Debug)]
pub struct UniformCell(Rc<RefCell<UniformValue>>);

impl UniformCell {
    pub fn new(value: UniformValue) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub fn get(&self) -> UniformValue {
        self.0.borrow().clone()
    }

    pub fn set(&self, value: UniformValue) {
        *self.0.borrow_mut() = value;
    }

    /// True when both handles point at the same cell.
    pub fn shares_identity(&self, other: &UniformCell) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// The host-library-owned shading program handed to the pre-compile hook:
/// two rewritable source strings plus the live uniform table.
#[derive(Debug, Default)]
pub struct ShaderProgram {
    pub vertex_source: String,
    pub fragment_source: String,
    pub uniforms: BTreeMap<String, UniformCell>,
}

struct TypeInner {
    template: ShaderTemplate,
    uniforms: Uniforms,
    varyings: Varyings,
    state: AssemblyState,
    cache: RefCell<ProgramCache>,
}

/// A derived material type: base template + declared inputs + collected
/// contribution state, with a shared program cache across its instances.
///
/// Input names are published into the program's uniform table verbatim;
/// choosing names that collide with identifiers the base template already
/// uses is the caller's responsibility and is not guarded here.
#[derive(Clone)]
pub struct MaterialType {
    inner: Rc<TypeInner>,
}

impl MaterialType {
    pub fn new(
        template: ShaderTemplate,
        uniforms: Uniforms,
        varyings: Varyings,
        contributions: &[FragmentContribution],
    ) -> Self {
        Self {
            inner: Rc::new(TypeInner {
                template,
                uniforms,
                varyings,
                state: collect(contributions),
                cache: RefCell::new(ProgramCache::new()),
            }),
        }
    }

    pub fn template(&self) -> &ShaderTemplate {
        &self.inner.template
    }

    pub fn state(&self) -> &AssemblyState {
        &self.inner.state
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.inner.uniforms
    }

    pub fn varyings(&self) -> &Varyings {
        &self.inner.varyings
    }

    /// The assembled program for this type's current structure. Memoized:
    /// repeated calls return the same `Rc` until the structure changes.
    pub fn compiled(&self) -> Rc<CompiledProgram> {
        self.inner.cache.borrow_mut().get_or_assemble(
            &self.inner.template,
            &self.inner.state,
            &self.inner.uniforms,
            &self.inner.varyings,
        )
    }

    /// Construct one material instance with fresh cells seeded from each
    /// uniform's declared initial value.
    pub fn instantiate(&self) -> ComposedMaterial {
        let cells = self
            .inner
            .uniforms
            .iter()
            .map(|(name, input)| (name.clone(), UniformCell::new(input.value.clone())))
            .collect();
        ComposedMaterial {
            ty: self.clone(),
            cells,
        }
    }
}

/// One material instance: per-instance uniform cells plus the type they came
/// from. Behaves like the base material plus the declared settable inputs.
pub struct ComposedMaterial {
    ty: MaterialType,
    cells: BTreeMap<String, UniformCell>,
}

impl ComposedMaterial {
    pub fn material_type(&self) -> &MaterialType {
        &self.ty
    }

    /// The cell backing a declared input, if any.
    pub fn cell(&self, name: &str) -> Option<&UniformCell> {
        self.cells.get(name)
    }

    /// Read a declared input's current value.
    pub fn get(&self, name: &str) -> Result<UniformValue> {
        self.cells
            .get(name)
            .map(UniformCell::get)
            .ok_or_else(|| anyhow!("material has no declared input `{name}`"))
    }

    /// Write a declared input's value in place. Never triggers assembly or
    /// recompilation; the program observes the new value through the shared
    /// cell.
    pub fn set(&self, name: &str, value: UniformValue) -> Result<()> {
        let cell = self
            .cells
            .get(name)
            .ok_or_else(|| anyhow!("material has no declared input `{name}`"))?;
        cell.set(value);
        Ok(())
    }

    /// Pre-compile hook, invoked by the host immediately before program
    /// linking: publishes every cell into the program's uniform table and
    /// rewrites the program's two source strings from the assembled result.
    ///
    /// Idempotent across repeated invocations — the same structure yields the
    /// same cached source text, and re-publishing a cell is a no-op for
    /// observers since the handle points at the same cell.
    pub fn on_before_compile(&self, program: &mut ShaderProgram) {
        for (name, cell) in &self.cells {
            program.uniforms.insert(name.clone(), cell.clone());
        }

        let compiled = self.ty.compiled();
        program.vertex_source = compiled.vertex_source.clone();
        program.fragment_source = compiled.fragment_source.clone();
    }
}
