pub mod core;
pub mod storage;
pub mod analysis;
pub mod integrity;
pub mod progress;
pub mod search;
pub mod session;

pub use crate::core::config::Config;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::library::Library;

/*
┌────────────────────────────────────────────────────────────────────────────────────────────┐
│                            LEARNINGMATE STRUCT ARCHITECTURE                                  │
└────────────────────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────────────── CORE LAYER ──────────────────────────────────────────┐
│                                                                                              │
│  ┌────────────────────────────────────────────────────────────────────────────────────┐    │
│  │                               struct Library                                        │    │
│  │  ┌──────────────────────────────────────────────────────────────────────────────┐ │    │
│  │  │ stores: Stores                    // Four independent record stores          │ │    │
│  │  │ catalog: FileCatalog              // Every write that can orphan a record    │ │    │
│  │  │ progress: ProgressTracker         // Attempt outcomes, sticky wrong counter  │ │    │
│  │  │ aggregator: Aggregator            // Cross-file read-only queries            │ │    │
│  │  │ settings: SettingsRepo            // Singleton preferences record            │ │    │
│  │  └──────────────────────────────────────────────────────────────────────────────┘ │    │
│  └────────────────────────────────────────────────────────────────────────────────────┘    │
│                                                                                              │
│  ┌──────────────────────┐  ┌──────────────────────┐  ┌───────────────────────────────┐    │
│  │ struct FileRecord    │  │ struct ProblemRecord │  │ struct ProgressRecord         │    │
│  │ • id: FileId         │  │ • id: ProblemId      │  │ • problem_id (store key)      │    │
│  │ • original_filename  │  │ • file_set_id ───────┼─▶│ • file_set_id (denormalized)  │    │
│  │ • total_problems     │  │ • sequence_number    │  │ • is_completed                │    │
│  │ • deleted_at (trash) │  │ • answer, choices    │  │ • is_correct: Option<bool>    │    │
│  └──────────────────────┘  └──────────────────────┘  │ • wrong_count (0 or 1)        │    │
│                                                       └───────────────────────────────┘    │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌───────────────────────────────────── STORAGE LAYER ─────────────────────────────────────────┐
│                                                                                              │
│  trait RecordStore<V>: get / set / remove / for_each   (one call = one durable write)       │
│                                                                                              │
│  ┌──────────────────────┐  ┌──────────────────────────────────────────────────────────┐    │
│  │ MemoryStore<V>       │  │ LogStore<V>                                              │    │
│  │ • BTreeMap in RwLock │  │ • entries: RwLock<BTreeMap>   // live state              │    │
│  └──────────────────────┘  │ • wal: Mutex<Wal>             // [len][crc32][bincode]    │    │
│                            │ • checkpoint.bin              // lz4 snapshot + crc32     │    │
│                            │ • _lock: FileLock             // flock, one opener        │    │
│                            └──────────────────────────────────────────────────────────┘    │
│                                                                                              │
│  <storage_path>/{files,problems,progress,settings}/{wal.log, checkpoint.bin, .lock}         │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── SESSION LAYER ──────────────────────────────────────────┐
│                                                                                              │
│  struct StudySession                                                                         │
│  • key: (file_id, order_mode, filters)   // equal key on start = keep running session        │
│  • seed = Σ utf16(file_id) [+ now_ms on restart]                                             │
│  • problems: seeded_shuffle(problems, seed) when random                                      │
│  • choices[pid]: build_choices(problem, pool, seed + Σ utf16(pid))                           │
│  • answers[pid]: SessionAnswer merged from AnswerPatch                                       │
│  • current_index                                                                             │
└──────────────────────────────────────────────────────────────────────────────────────────────┘
*/
