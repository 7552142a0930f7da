use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use log::{debug, info, initialize_logger};
use structopt::StructOpt;
use time::Date;

use tracker::checklist::{self, ChecklistField};
use tracker::collection::Collection;
use tracker::config::Config;
use tracker::dates::{format_date, parse_date};
use tracker::environment::{system_clock, Environment};
use tracker::errors::TrackerError;
use tracker::export;
use tracker::query::{Filter, RecordingFilter, StatusFilter, View};
use tracker::record::{Priority, ProductionRecord, RecordId, METRIC_KEYS};
use tracker::rms::RmsRecordType;
use tracker::status::Status;

#[derive(Debug, StructOpt)]
#[structopt(name = "tracker", about = "Intake and status tracking for recording and editing jobs")]
enum Command {
    /// Record a new project
    Add(AddOptions),

    /// List projects, newest first
    List {
        /// Text to look for in client, event, venue and project ID
        #[structopt(short, long, default_value = "")]
        query: String,

        /// A status, or "all"
        #[structopt(short, long, default_value = "all")]
        status: StatusFilter,

        /// "all", "yes" (needs recording) or "no"
        #[structopt(short, long, default_value = "all")]
        recording: RecordingFilter,
    },

    /// Show every field of one project
    Show { id: String },

    /// Move a project to the next status
    Advance { id: String },

    /// Set a project's status directly
    SetStatus { id: String, status: Status },

    /// Check or uncheck one checklist item
    Toggle {
        id: String,
        field: ChecklistField,
        value: String,
    },

    /// Delete a project
    Remove { id: String },

    /// Write every project to a CSV file
    Export {
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
    },

    /// Print the choices offered for one checklist, or all of them
    Vocabulary { field: Option<ChecklistField> },
}

#[derive(Debug, StructOpt)]
struct AddOptions {
    #[structopt(long)]
    project_id: Option<String>,

    #[structopt(long)]
    client: Option<String>,

    #[structopt(long)]
    event: Option<String>,

    #[structopt(long)]
    venue: Option<String>,

    /// YYYY-MM-DD
    #[structopt(long, parse(try_from_str = parse_date))]
    event_date: Option<Date>,

    /// YYYY-MM-DD
    #[structopt(long, parse(try_from_str = parse_date))]
    deliverables_date: Option<Date>,

    #[structopt(long)]
    priority: Option<Priority>,

    #[structopt(long)]
    lead: Option<String>,

    #[structopt(long)]
    camera_op: Option<String>,

    #[structopt(long)]
    editor: Option<String>,

    /// Mark the job as not needing a recording
    #[structopt(long)]
    no_recording: bool,

    #[structopt(long)]
    recording_type: Option<String>,

    #[structopt(long)]
    tech: Option<String>,

    #[structopt(long)]
    file_link: Option<String>,

    #[structopt(long)]
    notes: Option<String>,

    #[structopt(long)]
    scope: Option<String>,

    /// opportunities, projects or orders
    #[structopt(long)]
    rms_type: Option<RmsRecordType>,

    #[structopt(long)]
    rms_id: Option<String>,

    #[structopt(long)]
    status: Option<Status>,

    /// A checklist item as FIELD=VALUE; repeatable
    #[structopt(long = "check", number_of_values = 1)]
    checks: Vec<Check>,

    /// A metric as KEY=VALUE; repeatable
    #[structopt(long = "metric", number_of_values = 1, parse(try_from_str = parse_pair))]
    metrics: Vec<(String, String)>,
}

#[derive(Debug)]
struct Check(ChecklistField, String);

impl FromStr for Check {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, value) = parse_pair(s)?;

        Ok(Check(field.parse()?, value))
    }
}

fn parse_pair(s: &str) -> Result<(String, String), TrackerError> {
    let mut parts = s.splitn(2, '=');

    match (parts.next(), parts.next()) {
        (Some(key), Some(value)) if !key.trim().is_empty() => Ok((key.trim().to_owned(), value.to_owned())),
        _ => Err(TrackerError::InvalidConfig {
            name: s.to_owned(),
            reason: "expected KEY=VALUE".to_owned(),
        }),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let command = Command::from_args();
    let config = Config::from_env()?;
    let logger = Arc::new(initialize_logger(config.log_level));

    debug!(logger, "Starting..."; "snapshot" => %config.snapshot_path.display());

    let environment = Environment::new(logger.clone(), config, system_clock());
    let mut collection = environment.open_collection();

    run(command, &environment, &mut collection)?;

    info!(logger, "Done"; "projects" => collection.len());

    Ok(())
}

fn run(command: Command, environment: &Environment, collection: &mut Collection) -> Result<(), TrackerError> {
    match command {
        Command::Add(options) => {
            let record = options.into_record(environment.draft());
            println!("{}", record.id);
            collection.add(record);
        }
        Command::List {
            query,
            status,
            recording,
        } => {
            let filter = Filter {
                text: query,
                status,
                recording,
            };
            let views = environment.query().view(collection.iter(), &filter);

            if views.is_empty() {
                println!("No projects match.");
            }

            for view in &views {
                println!("{}", summarize(view));
            }
        }
        Command::Show { id } => {
            let id = RecordId::from(id);
            let record = collection
                .get(&id)
                .ok_or_else(|| TrackerError::NonExistentId(id.to_string()))?;
            let views = environment.query().view(std::iter::once(record), &Filter::default());

            for view in &views {
                describe(view);
            }
            println!("  Open RMS:      {}", environment.links.home());
        }
        Command::Advance { id } => {
            let id = RecordId::from(id);
            let status = collection
                .advance(&id)
                .ok_or_else(|| TrackerError::NonExistentId(id.to_string()))?;
            println!("{}: {}", id, status);
        }
        Command::SetStatus { id, status } => {
            let id = RecordId::from(id);
            require(collection.set_status(&id, status), &id)?;
            println!("{}: {}", id, status);
        }
        Command::Toggle { id, field, value } => {
            let id = RecordId::from(id);
            let selected = collection
                .toggle(&id, field, &value)
                .ok_or_else(|| TrackerError::NonExistentId(id.to_string()))?;
            println!("{} {}: {}", if selected { "+" } else { "-" }, field.title(), value);
        }
        Command::Remove { id } => {
            let id = RecordId::from(id);
            require(collection.remove(&id), &id)?;
        }
        Command::Export { output } => {
            let path = output.unwrap_or_else(|| environment.config.export_path.clone());
            export::write_csv(&path, collection.iter(), &environment.links)?;
            info!(environment.logger, "Exported projects"; "path" => %path.display(), "count" => collection.len());
            println!("{}", path.display());
        }
        Command::Vocabulary { field } => {
            let fields = match field {
                Some(field) => vec![field],
                None => ChecklistField::ALL.to_vec(),
            };

            for field in fields {
                println!("{} ({})", field.title(), field.key());
                for choice in field.vocabulary() {
                    println!("  {}", choice);
                }
            }

            if field.is_none() {
                println!("Metrics");
                for key in METRIC_KEYS {
                    println!("  {}", key);
                }
            }
        }
    }

    Ok(())
}

fn require(found: bool, id: &RecordId) -> Result<(), TrackerError> {
    if found {
        Ok(())
    } else {
        Err(TrackerError::NonExistentId(id.to_string()))
    }
}

impl AddOptions {
    fn into_record(self, mut record: ProductionRecord) -> ProductionRecord {
        record.project_id = self.project_id;
        record.client_name = self.client;
        record.event_name = self.event;
        record.venue = self.venue;
        record.event_date = self.event_date;
        record.deliverables_date = self.deliverables_date;
        record.priority = self.priority;
        record.project_lead = self.lead;
        record.camera_op = self.camera_op;
        record.editor = self.editor;
        record.recording_required = !self.no_recording;
        record.recording_type = self.recording_type;
        record.assigned_tech = self.tech;
        record.file_link = self.file_link;
        record.notes = self.notes;
        record.scope = self.scope;
        record.rms_record_type = self.rms_type;
        record.rms_id_or_slug = self.rms_id;

        if let Some(status) = self.status {
            record.status = status;
        }

        for Check(field, value) in self.checks {
            if !field.get(&record).contains(&value) {
                record = checklist::toggle(record, field, &value);
            }
        }

        for (key, value) in self.metrics {
            record.set_metric(key, value);
        }

        record
    }
}

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "—",
    }
}

fn summarize(view: &View<'_>) -> String {
    let record = view.record;
    let event_date = record.event_date.map(format_date);

    let mut line = format!(
        "{:<10} {:<32} {:<24} {:<10}",
        record.status.label(),
        or_dash(record.event_name.as_deref()),
        or_dash(record.client_name.as_deref()),
        or_dash(event_date.as_deref()),
    );

    line.push_str(if record.recording_required { " rec:yes" } else { " rec:no " });

    if view.upcoming {
        line.push_str(" [upcoming ≤7d]");
    }
    if view.overdue {
        line.push_str(" [overdue]");
    }
    if let (Some(t), Some(i)) = (record.rms_record_type, record.rms_id_or_slug.as_deref()) {
        if !view.rms_url.is_empty() {
            line.push_str(&format!(" rms:{}/{}", t, i));
        }
    }

    format!("{}  {}", record.id, line)
}

fn describe(view: &View<'_>) {
    let record = view.record;
    let date = |d: Option<Date>| d.map(format_date).unwrap_or_else(|| "—".to_owned());

    println!("{}", or_dash(record.event_name.as_deref()));
    println!("  ID:            {}", record.id);
    println!("  Project ID:    {}", or_dash(record.project_id.as_deref()));
    println!("  Status:        {}", record.status);
    println!("  Client:        {}", or_dash(record.client_name.as_deref()));
    println!("  Venue:         {}", or_dash(record.venue.as_deref()));
    println!("  Event date:    {}{}", date(record.event_date), if view.upcoming { " (upcoming)" } else { "" });
    println!("  Deliverables:  {}{}", date(record.deliverables_date), if view.overdue { " (overdue)" } else { "" });
    println!("  Priority:      {}", record.priority.map(|p| p.label()).unwrap_or("—"));
    println!(
        "  Lead / camera / editor: {} / {} / {}",
        or_dash(record.project_lead.as_deref()),
        or_dash(record.camera_op.as_deref()),
        or_dash(record.editor.as_deref())
    );
    println!(
        "  Recording:     {}{}",
        if record.recording_required { "Required" } else { "No" },
        record.recording_type.as_deref().map(|t| format!(" — {}", t)).unwrap_or_default()
    );
    println!("  Assigned tech: {}", or_dash(record.assigned_tech.as_deref()));
    println!("  File link:     {}", or_dash(record.file_link.as_deref()));
    println!("  RMS:           {}", or_dash(Some(view.rms_url.as_str())));
    println!("  Scope:         {}", or_dash(record.scope.as_deref()));

    for field in ChecklistField::ALL.iter() {
        let selected = field.get(record);

        if !selected.is_empty() {
            println!("  {}: {}", field.title(), selected.iter().cloned().collect::<Vec<_>>().join(", "));
        }
    }

    for (key, value) in &record.metrics {
        println!("  {}: {}", key, value);
    }

    println!("  Notes:         {}", or_dash(record.notes.as_deref()));
}
