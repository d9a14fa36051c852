mod concurrent_gates;
mod drive_through;
mod emergency_stop;
