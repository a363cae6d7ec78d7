//! osm-smart-menu 链接互转演示程序
//! 功能说明：
//! 1. 使用内置站点表初始化全局翻译器
//! 2. 识别一个地图链接，输出属性集合
//! 3. 为其他站点生成“所有站点”菜单
//! 4. 演示页面快照兜底提取（Bing 地图 history.state）
//!
//! 运行命令：
//! cargo run --example translate_demo

use std::error::Error;
use std::time::Instant;

use env_logger::{Builder, Env, Target};
use osm_smart_menu::{global_translator, init_global_translator, PageSnapshot, TranslatorConfig};
use serde_json::{json, to_string_pretty};

fn main() -> Result<(), Box<dyn Error>> {
    // ========== 1. 日志系统初始化 ==========
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    // ========== 2. 初始化全局翻译器 ==========
    init_global_translator(TranslatorConfig::embedded())?;
    let translator = global_translator()?;
    println!("✅ 翻译器初始化完成 | 站点数: {}", translator.registry().len());

    // ========== 3. 识别 + 菜单生成 ==========
    let source = "https://www.openstreetmap.org/way/123456#map=17/51.5/-0.12";
    let start_instant = Instant::now();
    let recognized = translator.recognize(source)?;
    let links = translator.links_for_url(source, None)?;
    let elapsed = start_instant.elapsed();

    println!("🔍 来源: {}", source);
    println!("📋 识别结果:\n{}", to_string_pretty(&recognized)?);
    println!("🔗 可跳转站点 ({} 个, 耗时 {:?}):", links.len(), elapsed);
    for link in &links {
        println!("  {:<22} {}", link.site, link.url);
    }

    // ========== 4. 页面快照兜底 ==========
    let page = PageSnapshot::new().with_history_state(json!({
        "state": {"MapModeStateHistory": {"level": 10, "centerPoint": {"latitude": 51.5, "longitude": -0.12}}}
    }));
    let bing = translator.recognize_with_page("https://www.bing.com/maps", &page)?;
    println!("🧭 Bing 页面状态提取: {}", to_string_pretty(&bing.attributes)?);
    println!(
        "➡️  对应 OpenStreetMap 链接: {}",
        translator.generate("openstreetmap", &bing.attributes)?
    );

    Ok(())
}
