use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use curator_client::CuratorClient;
use curator_client::config::Config;
use curator_client::directory::{self, MuseumDirectory};
use curator_client::gallery::{self, GalleryQuery};
use curator_client::state::{ImageAttachment, Mode};
use curator_client::studio::GenerateImageRequest;
use curator_client::visual::VisualOutput;

#[tokio::main]
async fn main() -> Result<()> {
    // Tracing to stderr so chat output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = Config::load();
    let mut client = CuratorClient::new(&cfg)?;
    let visual = VisualOutput::new();

    visual.transcript(client.panel.transcript().entries());
    println!("(type /help for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_notices(&mut client, &visual);
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').unwrap_or((line.as_str(), "")) {
            ("/quit", _) | ("/exit", _) => break,
            ("/help", _) => print_help(),
            ("/new", _) => {
                client.panel.create_new_chat();
                visual.transcript(client.panel.transcript().entries());
            }
            ("/list", _) => {
                client.panel.load_conversations(false).await;
                print_conversations(&client, &visual);
            }
            ("/more", _) => {
                client.panel.load_conversations(true).await;
                print_conversations(&client, &visual);
            }
            ("/less", _) => {
                client.panel.show_less_conversations().await;
                print_conversations(&client, &visual);
            }
            ("/open", index) => {
                open_conversation(&mut client, &visual, index).await;
            }
            ("/mode", which) => match which {
                "curator" => client.panel.set_mode(Mode::Curator),
                "image" => client.panel.set_mode(Mode::ImageGeneration),
                _ => visual.error("usage: /mode <curator|image>"),
            },
            ("/attach", path) => attach(&mut client, &visual, path),
            ("/detach", _) => client.panel.clear_image(),
            ("/generate", prompt) => generate(&client, &visual, prompt).await,
            ("/archive", search) => {
                let view = client.archive.search(&archive_query(search)).await;
                match view.error {
                    Some(message) => visual.error(&message),
                    None => visual.gallery(&view.images),
                }
            }
            ("/museums", city) => museums(&cfg, &visual, city),
            _ => {
                client.panel.send_message(&line).await;
                visual.transcript(client.panel.transcript().entries());
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  /new               start a new chat");
    println!("  /list /more /less  conversation list paging");
    println!("  /open <n>          open the n-th listed conversation");
    println!("  /mode <curator|image>");
    println!("  /attach <path>     stage an image for the next message");
    println!("  /detach            drop the staged image");
    println!("  /generate <prompt> run the image studio");
    println!("  /archive [search]  browse the image archive");
    println!("  /museums [city]    browse the museum directory");
    println!("  /quit");
    println!("anything else is sent to the curator");
}

/// `style:<label>` tokens become the style filter (via the chip mapping);
/// the rest of the input is the free-text search.
fn archive_query(input: &str) -> GalleryQuery {
    let mut style = None;
    let mut search_terms = Vec::new();
    for token in input.split_whitespace() {
        match token.strip_prefix("style:") {
            Some(label) => style = gallery::style_keyword(label).map(str::to_string),
            None => search_terms.push(token),
        }
    }
    GalleryQuery {
        search: (!search_terms.is_empty()).then(|| search_terms.join(" ")),
        style,
        ..GalleryQuery::default()
    }
}

fn print_notices(client: &mut CuratorClient, visual: &VisualOutput) {
    client.panel.notices_mut().purge_expired();
    for notice in client.panel.notices().items() {
        visual.notice(notice);
    }
}

fn print_conversations(client: &CuratorClient, visual: &VisualOutput) {
    visual.conversation_list(
        client.panel.conversations(),
        &client.panel.state().current_conversation_id,
        client.panel.pager_button(),
    );
}

async fn open_conversation(client: &mut CuratorClient, visual: &VisualOutput, index: &str) {
    let Ok(n) = index.trim().parse::<usize>() else {
        visual.error("usage: /open <n>");
        return;
    };
    let Some(summary) = client.panel.conversations().get(n.saturating_sub(1)) else {
        visual.error("no such conversation; run /list first");
        return;
    };
    let id = summary.session_id.clone();
    client.panel.select_conversation(&id).await;
    visual.transcript(client.panel.transcript().entries());
}

fn attach(client: &mut CuratorClient, visual: &VisualOutput, path: &str) {
    let path = path.trim();
    if path.is_empty() {
        visual.error("usage: /attach <path>");
        return;
    }
    match std::fs::read(path) {
        Ok(bytes) => {
            let file_name = std::path::Path::new(path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "attachment".to_string());
            client.panel.attach_image(ImageAttachment { file_name, bytes });
            println!("staged {path} for the next message");
        }
        Err(err) => visual.error(&format!("could not read {path}: {err}")),
    }
}

async fn generate(client: &CuratorClient, visual: &VisualOutput, prompt: &str) {
    let request = GenerateImageRequest {
        prompt: prompt.to_string(),
        negative_prompt: None,
        input_image: None,
    };
    match client
        .studio
        .generate(request, |message, pct| visual.progress(message, pct))
        .await
    {
        Ok(images) => {
            for image in images {
                println!("generated {} -> {}", image.name, image.url);
            }
        }
        Err(err) => visual.error(&err.to_string()),
    }
}

fn museums(cfg: &Config, visual: &VisualOutput, city: &str) {
    let Some(path) = cfg.directory.data_path.as_deref() else {
        visual.error("no museum directory installed (set directory.data_path)");
        return;
    };
    let catalog = match MuseumDirectory::load(path) {
        Ok(loaded) => loaded,
        Err(err) => {
            visual.error(&format!("could not load museum directory: {err}"));
            return;
        }
    };
    let city = city.trim();
    let venues: Vec<_> = if city.is_empty() {
        catalog.all().iter().collect()
    } else {
        catalog.filter_by_city(city)
    };
    if venues.is_empty() {
        println!("no venues matched");
        return;
    }
    for museum in venues {
        println!("{}", museum.name);
        for line in directory::detail_lines(museum) {
            println!("  {line}");
        }
    }
}
