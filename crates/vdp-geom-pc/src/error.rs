use vdp_geom_core::math::MatrixStackError;
use vdp_geom_core::render::mesh::MeshError;
use vdp_geom_core::RenderError;

/// Errors that stop the host demo.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// I/O error writing the command table dump.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A geometry pass was aborted.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Scene data failed mesh validation.
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    /// Unbalanced world transform push/pop.
    #[error("Matrix stack error: {0}")]
    MatrixStack(#[from] MatrixStackError),

    /// More demo textures than the texture table holds.
    #[error("Texture table full ({capacity} entries)")]
    TextureTableFull { capacity: usize },
}
