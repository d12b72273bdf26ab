use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use portable_doc::command::Direction;
use portable_doc::config::{Flags, KeyStyle, Setup};
use portable_doc::key::{RandomKeys, SequentialKeys};
use portable_doc::model::Node;
use portable_doc::{from_portable_with, portable, to_portable_with};
use structopt::StructOpt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            #[cfg(debug_assertions)]
            "warn,portable_doc=debug",
            #[cfg(not(debug_assertions))]
            "warn,portable_doc=info",
        )
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(ErrorLayer::default())
        .init();
}

async fn read_input(setup: &Setup) -> Result<String> {
    match &setup.input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Could not read {}", path.display())),
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .wrap_err("Could not read stdin")?;
            Ok(buf)
        }
    }
}

async fn write_output(setup: &Setup, mut output: String) -> Result<()> {
    match &setup.output {
        Some(path) => tokio::fs::write(path, output)
            .await
            .wrap_err_with(|| format!("Could not write {}", path.display())),
        None => {
            output.push('\n');
            let mut stdout = tokio::io::stdout();
            stdout.write_all(output.as_bytes()).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}

fn convert(setup: &Setup, input: &str) -> Result<String> {
    let output = match setup.direction {
        Direction::ToPortable => {
            let doc = Node::from_json(input)?;
            let blocks = match setup.keys {
                KeyStyle::Random => to_portable_with(&doc, &mut RandomKeys),
                KeyStyle::Sequential => to_portable_with(&doc, &mut SequentialKeys::default()),
            };
            info!("Converted document into {} blocks", blocks.len());
            portable::to_json(&blocks, setup.pretty)?
        }
        Direction::FromPortable => {
            let blocks = portable::from_json(input)?;
            let doc = from_portable_with(&blocks, &setup.options);
            info!("Rebuilt document with {} nodes", doc.content().len());
            doc.to_json(setup.pretty)?
        }
        Direction::Text => {
            let blocks = portable::from_json(input)?;
            portable::to_plain_text(&blocks)
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    install_tracing();
    color_eyre::install()?;

    let flags = Flags::from_args();
    let setup = flags.load_cfg().await?;
    debug!("Using {:?}", setup);

    let input = read_input(&setup).await?;
    let output = convert(&setup, &input)?;
    write_output(&setup, output).await
}
