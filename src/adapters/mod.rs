//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements   | Connects to                    |
//! |---------------|--------------|--------------------------------|
//! | `relays`      | RelayPort    | Relay modules on GPIO outputs  |
//! | `time`        | TimePort     | esp_timer / `Instant`          |
//! | `log_sink`    | EventSink    | Serial / stderr log output     |
//! | `config_file` | ConfigPort   | JSON file named by env var     |
//! | `sim_sensor`  | (input)      | stdin, host only               |
//! | `signals`     | (input)      | SIGINT / SIGTERM, host only    |

pub mod config_file;
pub mod log_sink;
pub mod relays;
pub mod time;

#[cfg(not(target_os = "espidf"))]
pub mod sim_sensor;

#[cfg(all(unix, not(target_os = "espidf")))]
pub mod signals;
