//! Building a [`Logger`] from a parsed [`Config`].

use super::{Logger, LoggerBuilder};
use crate::Error;
use crate::config::{Config, OutputConfig, parse_prefix};
use crate::internal;
use crate::level::{Level, Threshold};
use crate::output::{FileSink, SinkHandle};
use crate::registry::Id;

impl Logger {
    /// Builds a logger with the configured outputs and channels. Channels are requested by
    /// name, so [`Logger::request_id`] with the same name later returns the configured id.
    ///
    /// # Errors
    /// Unknown level, color or prefix names, unopenable files, or exceeded capacities.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        internal::init_with_config(config);

        let general = &config.general;
        let mut builder = LoggerBuilder::new()
            .max_ids(config.capacity.ids)
            .max_outputs(config.capacity.outputs)
            .max_id_outputs(config.capacity.id_outputs)
            .enabled(general.enabled)
            .rate_limit(general.rate_limit)
            .suppress_repeats(general.suppress_repeats);
        if let Some(fields) = &general.prefix {
            builder = builder.prefix(parse_prefix(fields)?);
        }
        let logger = builder.try_build()?;

        if config.color.prefix {
            logger.enable_prefix_color();
        }
        if config.color.message {
            logger.enable_message_color();
        }
        for (name, entry) in &config.color.levels {
            let level: Level = name.parse()?;
            logger.set_prefix_color_spec(level, entry.to_spec()?);
        }

        for output in &config.outputs {
            let handle = open(output)?;
            logger.register_output(&handle)?;
            apply(output, |t| logger.set_output_threshold(&handle, t), |c| {
                logger.set_output_color(&handle, c)
            })?;
        }

        for (name, channel) in &config.channels {
            let id = logger.request_id(Some(name))?;
            logger.set_id_threshold(id, channel.threshold()?)?;
            if channel.enabled {
                logger.enable_id(id)?;
            }
            if let Some(fields) = &channel.prefix {
                logger.set_id_prefix(id, parse_prefix(fields)?)?;
            }
            if let Some(color) = &channel.color {
                logger.set_id_color_spec(id, Some(color.to_spec()?))?;
            }
            for output in &channel.outputs {
                attach(&logger, id, output)?;
            }
        }

        internal::debug(
            "CONFIG",
            &format!(
                "Logger built: {} outputs, {} channels",
                config.outputs.len(),
                config.channels.len()
            ),
        );
        Ok(logger)
    }
}

fn attach(logger: &Logger, id: Id, output: &OutputConfig) -> Result<(), Error> {
    let handle = open(output)?;
    logger.register_id_output(id, &handle)?;
    apply(
        output,
        |t| logger.set_id_output_threshold(id, &handle, t),
        |c| logger.set_id_output_color(id, &handle, c),
    )
}

fn apply(
    output: &OutputConfig,
    set_threshold: impl FnOnce(Threshold) -> Result<(), Error>,
    set_color: impl FnOnce(bool) -> Result<(), Error>,
) -> Result<(), Error> {
    let threshold = output.threshold()?;
    if threshold != Threshold::Unset {
        set_threshold(threshold)?;
    }
    if let Some(color) = output.color {
        set_color(color)?;
    }
    Ok(())
}

fn open(output: &OutputConfig) -> Result<SinkHandle, Error> {
    match output.kind.to_lowercase().as_str() {
        "stdout" => Ok(SinkHandle::stdout()),
        "stderr" => Ok(SinkHandle::stderr()),
        "file" => {
            let path = output.path.as_deref().ok_or_else(|| {
                Error::InvalidConfig("file output needs a path".to_string())
            })?;
            let expanded = shellexpand::full(path)
                .map_err(|e| Error::InvalidConfig(format!("cannot expand {path}: {e}")))?;
            let sink = if output.append {
                FileSink::append(&*expanded)?
            } else {
                FileSink::create(&*expanded)?
            };
            Ok(SinkHandle::new(sink))
        }
        other => Err(Error::InvalidConfig(format!("unknown output kind: {other}"))),
    }
}
