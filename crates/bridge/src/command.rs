//! The pack command: host arguments in, packed UVs out.

use crate::extract::extract_uvs;
use crate::host::{active_layers, MeshScene};
use crate::writeback::write_back;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uvpack_core::{
    apply_pack_solution, Error, OpExecutor, OperationInput, PackEngine, PackParams,
    ProgressMonitor, Result, ResultCode, DEFAULT_POLL_INTERVAL,
};

/// Default name of the UV map the command reads and writes.
pub const DEFAULT_UV_MAP: &str = "Texture";

/// Arguments exposed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackArgs {
    /// Allow islands to be scaled.
    pub stretch: bool,

    /// Allow islands to be rotated.
    pub orient: bool,

    /// Margin between islands in UV units.
    pub margin: f32,

    /// Margin between islands in pixels.
    pub pixel_margin: f32,

    /// Padding to the packing box border in pixels.
    pub pixel_padding: f32,

    /// Texture size used for the pixel margin.
    pub pixel_margin_texture_size: u32,

    /// Normalize island texel density before packing.
    pub normalize_islands: bool,

    /// Render invalid islands. Left to the engine when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_invalid: Option<bool>,
}

impl Default for PackArgs {
    fn default() -> Self {
        Self {
            stretch: true,
            orient: true,
            margin: 0.003,
            pixel_margin: 0.0,
            pixel_padding: 0.0,
            pixel_margin_texture_size: 2048,
            normalize_islands: false,
            render_invalid: None,
        }
    }
}

impl PackArgs {
    /// Parses arguments from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidArguments(e.to_string()))
    }

    /// Builds the engine parameter block.
    ///
    /// `polygons_selected` tells whether polygons are selected in polygon
    /// selection mode; if so the selection is packed around the rest.
    pub fn to_params(&self, polygons_selected: bool) -> PackParams {
        let mut params = PackParams::new()
            .with_margin(self.margin)
            .with_pixel_margin(
                self.pixel_margin,
                self.pixel_padding,
                self.pixel_margin_texture_size,
            )
            .with_fixed_scale(!self.stretch)
            .with_normalize_islands(self.normalize_islands)
            .with_pack_to_others(polygons_selected);

        if !self.orient {
            params = params.without_rotation();
        }
        if let Some(render) = self.render_invalid {
            params = params.with_render_invalid_islands(render);
        }
        params
    }
}

/// Bridge-side settings of the command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSettings {
    /// Name of the UV map to pack.
    pub uv_map: String,
    /// How often progress is polled.
    pub poll_interval: Duration,
    /// Validate engine input before running.
    pub validate_input: bool,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            uv_map: DEFAULT_UV_MAP.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            validate_input: cfg!(debug_assertions),
        }
    }
}

impl CommandSettings {
    /// Sets the UV map name.
    pub fn with_uv_map(mut self, uv_map: impl Into<String>) -> Self {
        self.uv_map = uv_map.into();
        self
    }

    /// Sets the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Enables or disables input validation.
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_input = enabled;
        self
    }

    fn executor(&self) -> OpExecutor {
        OpExecutor::new()
            .with_validation(self.validate_input)
            .with_poll_interval(self.poll_interval)
    }
}

/// Summary of a completed pack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackReport {
    /// Packer vertices sent to the engine.
    pub vertices: usize,
    /// Faces sent to the engine.
    pub faces: usize,
    /// Islands the solution transformed.
    pub islands_packed: usize,
    /// Polygon corners written back.
    pub corners_written: usize,
    /// Layers marked as UV-edited.
    pub layers_edited: usize,
    /// Time spent in the engine in milliseconds.
    pub computation_time_ms: u64,
}

/// Packs the UV islands of the active layers.
#[derive(Debug, Clone, Default)]
pub struct PackCommand {
    args: PackArgs,
    settings: CommandSettings,
}

impl PackCommand {
    /// Creates a command with default settings.
    pub fn new(args: PackArgs) -> Self {
        Self {
            args,
            settings: CommandSettings::default(),
        }
    }

    /// Replaces the settings.
    pub fn with_settings(mut self, settings: CommandSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The command arguments.
    pub fn args(&self) -> &PackArgs {
        &self.args
    }

    /// The command settings.
    pub fn settings(&self) -> &CommandSettings {
        &self.settings
    }

    /// The command is available when at least one layer is active.
    pub fn is_enabled<S: MeshScene + ?Sized>(scene: &S) -> Result<bool> {
        Ok(!active_layers(scene)?.is_empty())
    }

    /// Runs the command.
    ///
    /// Extracts the UVs, runs `engine` on a worker thread while relaying
    /// progress to `monitor`, then applies the solution and writes it back.
    /// A user abort through the monitor ends in [`Error::Cancelled`].
    pub fn execute<S, M>(
        &self,
        scene: &mut S,
        engine: Arc<dyn PackEngine>,
        monitor: &mut M,
    ) -> Result<PackReport>
    where
        S: MeshScene + ?Sized,
        M: ProgressMonitor + ?Sized,
    {
        let polygons_selected = scene.selected_polygon_count() > 0;
        let params = self.args.to_params(polygons_selected);
        if log::log_enabled!(log::Level::Debug) {
            if let Ok(json) = serde_json::to_string(&params) {
                log::debug!("pack params: {}", json);
            }
        }
        let extraction = extract_uvs(&*scene, &self.settings.uv_map)?;

        let input = OperationInput {
            params,
            uv_data: Arc::clone(extraction.uv_data()),
        };

        let output = match self.settings.executor().execute(engine, input, monitor) {
            Ok(output) => output,
            Err(Error::Validation(diagnostic)) => {
                log::error!("pack input rejected: {}", diagnostic);
                return Err(Error::PackFailed(ResultCode::GeneralError));
            }
            Err(e) => return Err(e),
        };

        if output.code == ResultCode::InvalidIslands {
            if let Some(invalid) = output.messages.invalid_islands() {
                log::warn!("packer rejected {} islands: {:?}", invalid.len(), invalid);
            }
        }

        let (islands, solutions) = output.solution()?;
        let solved = apply_pack_solution(extraction.uv_data(), islands, solutions)?;
        let stats = write_back(scene, &extraction, &solved, &self.settings.uv_map)?;

        let report = PackReport {
            vertices: extraction.vertex_count(),
            faces: extraction.face_count(),
            islands_packed: solutions.len(),
            corners_written: stats.corners_written,
            layers_edited: stats.layers_edited,
            computation_time_ms: output.computation_time_ms,
        };

        log::info!(
            "packed {} islands ({} faces) in {}ms",
            report.islands_packed,
            report.faces,
            report.computation_time_ms
        );
        Ok(report)
    }
}
