pub fn generate_starter_config() -> String {
    r#"# =============================================================================
# CWLOGS CONFIGURATION
# =============================================================================
# Every setting is optional; remove anything you do not want to override.
#
# Config file locations (in order of precedence):
#   1. Path specified via --config argument
#   2. ~/.config/cwlogs/config.yml
#   3. /etc/cwlogs/config.yml

# -----------------------------------------------------------------------------
# AWS
# -----------------------------------------------------------------------------
# Credentials come from the standard AWS chain (environment, shared config,
# instance role). --region and --profile on the command line win over these.
# aws:
#   region: us-west-2
#   profile: default

# -----------------------------------------------------------------------------
# READER
# -----------------------------------------------------------------------------
reader:
  # Pause between polls when following (--follow)
  poll_interval: 5s
  # Events buffered ahead of the terminal; the reader waits when it is full
  channel_capacity: 1
  # Recently seen event ids remembered to suppress duplicates across pages
  dedup_capacity: 10000
  # Streams a --task prefix may expand to (the service accepts at most 100)
  max_streams: 100

# -----------------------------------------------------------------------------
# OUTPUT
# -----------------------------------------------------------------------------
output:
  color: true
  # Default template for fetch. Placeholders: {task} {stream} {group} {id}
  # {time} {level} {message} {data} {errors}
  # format: '[ {task} ] {time} {level} - {message}'
  # Print a hint when a bounded fetch produces nothing for this long
  slow_warning: 7s
"#
    .to_string()
}
