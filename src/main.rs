use card_centering::{cli, config, error, export, render, scanner};
use card_centering_common::{sidecar_path, BorderName, CenteringReport, Measurement, SIDECAR_SUFFIX};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::{CenteringError, Result};
use std::path::{Path, PathBuf};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// 計測ファイルそのもの、または画像に対応するサイドカーを読み込む
fn load_measurement(target: &Path) -> Result<(PathBuf, Measurement)> {
    let path = if file_name_of(target).ends_with(SIDECAR_SUFFIX) {
        target.to_path_buf()
    } else {
        sidecar_path(target)
    };
    if !path.exists() {
        return Err(CenteringError::NoMeasurements(path.display().to_string()));
    }
    let measurement = Measurement::load(&path)?;
    Ok((path, measurement))
}

fn print_report(report: &CenteringReport) {
    let centering = report.centering();
    println!("  上下: {}", centering.vertical_label());
    println!("  左右: {}", centering.horizontal_label());
    println!("  最大ずれ: {:.1}%", report.worst_deviation);
    println!("  PSA: {} [{}]", report.psa_grade.label, report.psa_grade.severity);
    println!("  BGS: {} [{}]", report.bgs_grade.label, report.bgs_grade.severity);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init { image, output, force } => {
            if !image.is_file() {
                return Err(CenteringError::FileNotFound(image.display().to_string()));
            }
            let (width, height) = image::image_dimensions(&image)
                .map_err(|e| CenteringError::ImageLoad(format!("{}: {}", image.display(), e)))?;

            let output = output.unwrap_or_else(|| sidecar_path(&image));
            if output.exists() && !force {
                return Err(CenteringError::Config(format!(
                    "計測ファイルが既に存在します: {}（上書きは --force）",
                    output.display()
                )));
            }

            let config = Config::load()?;
            let measurement = Measurement::new(file_name_of(&image), width, height);
            measurement.save(&output)?;

            println!("✔ 計測ファイルを作成: {} ({}x{})", output.display(), width, height);
            print_report(&measurement.report(&config.grade_tables()));
        }

        Commands::Drag { target, border, to } => {
            let config = Config::load()?;
            let name: BorderName = border.parse()?;
            let (path, mut measurement) = load_measurement(&target)?;

            let before = measurement.borders.get(name);
            measurement.borders = measurement.borders.apply_drag(name, to);
            let after = measurement.borders.get(name);

            if before == after {
                println!("- {} は変化なし ({:.1})", name, after);
            } else {
                measurement.save(&path)?;
                if after != to {
                    println!("- {} を {:.1} にクランプ", name, after);
                }
                println!("✔ {}: {:.1} → {:.1}", name, before, after);
            }
            print_report(&measurement.report(&config.grade_tables()));
        }

        Commands::Grade { target, json } => {
            let config = Config::load()?;
            let (path, measurement) = load_measurement(&target)?;
            let report = measurement.report(&config.grade_tables());

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", measurement.file_name);
                log::debug!("measurement: {}", path.display());
                print_report(&report);
            }
        }

        Commands::Annotate { image, borders, output } => {
            let config = Config::load()?;
            let mut canvas = image::open(&image)
                .map_err(|e| CenteringError::ImageLoad(format!("{}: {}", image.display(), e)))?
                .to_rgba8();
            let (width, height) = canvas.dimensions();

            let measurement_path = borders.unwrap_or_else(|| sidecar_path(&image));
            let measurement = if measurement_path.exists() {
                let m = Measurement::load(&measurement_path)?;
                if (m.image_width, m.image_height) != (width, height) {
                    log::warn!(
                        "measurement size {}x{} differs from image {}x{}",
                        m.image_width, m.image_height, width, height
                    );
                }
                m
            } else {
                log::info!("no measurement at {}; using default borders", measurement_path.display());
                Measurement::new(file_name_of(&image), width, height)
            };

            render::draw_overlay(&mut canvas, &measurement.borders, &config.hit_config());

            let output = output.unwrap_or_else(|| {
                let stem = image.file_stem().and_then(|s| s.to_str()).unwrap_or("card");
                image.with_file_name(format!("{stem}.annotated.png"))
            });
            canvas
                .save(&output)
                .map_err(|e| CenteringError::ImageSave(format!("{}: {}", output.display(), e)))?;
            println!("✔ 注釈画像を保存: {}", output.display());
        }

        Commands::Export { folder, format, output, title, recursive } => {
            println!("📄 card-centering - エクスポート\n");
            let config = Config::load()?;

            println!("[1/3] 画像をスキャン中...");
            let images = scanner::scan_folder(&folder, recursive)?;
            if images.is_empty() {
                return Err(CenteringError::NoImagesFound(folder.display().to_string()));
            }
            println!("✔ {}枚の画像を検出\n", images.len());

            println!("[2/3] 判定中...");
            let outcome = export::grade_images(&images, &config.grade_tables(), true);
            if outcome.cards.is_empty() {
                return Err(CenteringError::NoMeasurements(folder.display().to_string()));
            }
            println!("✔ {}枚を判定（計測なし {}枚）\n", outcome.cards.len(), outcome.skipped.len());

            println!("[3/3] 出力中...");
            let output = output.unwrap_or_else(|| folder.clone());
            export::export_results(&outcome, &format, &output, &title)?;

            println!("\n✅ エクスポート完了");
        }

        Commands::Config { set_tolerance, reset, show } => {
            let mut config = if reset {
                let config = Config::default();
                config.save()?;
                println!("✔ 設定を既定値に戻しました");
                config
            } else {
                Config::load()?
            };

            if let Some(tolerance) = set_tolerance {
                config.set_tolerance(tolerance)?;
                println!("✔ 当たり判定の許容距離を {} に設定しました", tolerance);
            }

            if show || (!reset && set_tolerance.is_none()) {
                let tables = config.grade_tables();
                println!("設定: {}", Config::config_path()?.display());
                println!("  当たり判定: {}px", config.hit_tolerance);
                println!("  タブ: {}px (オフセット {}px)", config.tab_size, config.tab_offset);
                println!("  表示倍率: {}", config.fit_factor);
                for table in [&tables.psa, &tables.bgs] {
                    println!("  {}:", table.name);
                    for t in &table.thresholds {
                        if t.max_deviation.is_finite() {
                            println!("    ≤ {:>5.1}%  {}", t.max_deviation, t.label);
                        } else {
                            println!("    それ以上  {}", t.label);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
