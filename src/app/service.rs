//! Cooperative controller loop.
//!
//! [`Controller`] owns the event queue, every device, the menu and the hub
//! sync flags.  `tick` runs the whole pipeline once: poll inputs, service
//! timing deadlines, consume at most one queued event, execute a deferred
//! menu command, then service the hub flags in a fixed order.  Each flag is
//! cleared before its request goes out so a failed call is not retried in a
//! tight loop; the next trigger re-raises it.

use log::{info, warn};

use crate::app::commands::MenuAction;
use crate::app::ports::DisplayPort;
use crate::config::SystemConfig;
use crate::devices::alarm::{Alarm, AlarmMode};
use crate::devices::button::{Button, ButtonId};
use crate::devices::buzzer::Buzzer;
use crate::devices::fan::Fan;
use crate::devices::led::Led;
use crate::devices::motion::Motion;
use crate::devices::Device;
use crate::events::{DeviceEvent, EventQueue, EventSource, StateSnapshot};
use crate::hub::wire::HouseStateWire;
use crate::hub::{HttpTransport, HubClient, KeepaliveOutcome};
use crate::melody;
use crate::menu::MenuNavigator;

pub struct Controller {
    config: SystemConfig,
    queue: EventQueue,
    button_a: Button,
    button_b: Button,
    motion: Motion,
    alarm: Alarm,
    buzzer: Buzzer,
    fan: Fan,
    led: Led,
    menu: MenuNavigator,
    wall_msg: String,

    /// Local device state changed; push to the hub this tick.
    state_change_local: bool,
    /// The hub holds a newer desired state; pull it this tick.
    state_change_remote: bool,
    /// The keepalive timer elapsed since the last tick.
    keepalive_due: bool,
    /// The alarm fired and the hub has not heard yet.
    alarm_report_pending: bool,
    /// Button B command captured this tick, executed after event dispatch.
    pending_action: Option<MenuAction>,
    /// A `Reset` command was selected; the main loop shuts down.
    reset_requested: bool,
}

impl Controller {
    pub fn new(config: SystemConfig) -> Self {
        let buzzer = Buzzer::new(melody::THEME, config.buzzer_duty);
        let fan = Fan::new(config.fan_duty);

        let mut menu = MenuNavigator::new();
        menu.add_item("ALARM: DISARM   ", MenuAction::AlarmDisarm);
        menu.add_item("ALARM: ARM[GLOB]", MenuAction::AlarmArmGlobal);
        menu.add_item("ALARM: ARM[LOC] ", MenuAction::AlarmArmLocal);
        menu.add_item("BUZZER: PLAY    ", MenuAction::BuzzerPlay);
        menu.add_item("BUZZER: STOP    ", MenuAction::BuzzerStop);
        menu.add_item("FAN: ON[+]      ", MenuAction::FanOnClockwise);
        menu.add_item("FAN: ON[-]      ", MenuAction::FanOnCounterClockwise);
        menu.add_item("FAN: OFF        ", MenuAction::FanOff);
        menu.add_item("LED: ON         ", MenuAction::LedOn);
        menu.add_item("LED: OFF        ", MenuAction::LedOff);
        menu.add_item("RESET           ", MenuAction::Reset);

        Self {
            config,
            queue: EventQueue::new(),
            button_a: Button::new(ButtonId::A),
            button_b: Button::new(ButtonId::B),
            motion: Motion::new(),
            alarm: Alarm::new(),
            buzzer,
            fan,
            led: Led::new(),
            menu,
            wall_msg: String::new(),
            state_change_local: false,
            state_change_remote: false,
            keepalive_due: false,
            alarm_report_pending: false,
            pending_action: None,
            reset_requested: false,
        }
    }

    /// Raised by the main loop when the periodic keepalive timer fires.
    pub fn note_keepalive_due(&mut self) {
        self.keepalive_due = true;
    }

    pub fn reset_requested(&self) -> bool {
        self.reset_requested
    }

    pub fn alarm(&self) -> &Alarm {
        &self.alarm
    }

    pub fn buzzer(&self) -> &Buzzer {
        &self.buzzer
    }

    pub fn fan(&self) -> &Fan {
        &self.fan
    }

    pub fn led(&self) -> &Led {
        &self.led
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn wall_msg(&self) -> &str {
        &self.wall_msg
    }

    /// Composite snapshot of the whole house, ready for serialization.
    pub fn house_state(&self) -> HouseStateWire {
        HouseStateWire {
            alarm: (*self.alarm.state()).into(),
            buzzer: (*self.buzzer.state()).into(),
            fan: (*self.fan.state()).into(),
            led: (*self.led.state()).into(),
            motion: (*self.motion.state()).into(),
            wall_msg: self.wall_msg.clone(),
        }
    }

    /// Redraw both LCD rows: menu cursor on top, wall message below.
    pub fn refresh_display<D: DisplayPort>(&self, display: &mut D) {
        display.write_line(0, self.menu.current_label());
        display.write_line(1, &self.wall_msg);
    }

    /// One pass of the cooperative loop.  Called every 100 ms by the main
    /// loop with a monotonic uptime clock.
    pub fn tick<T: HttpTransport, D: DisplayPort>(
        &mut self,
        now_ms: u64,
        hub: &mut HubClient<T>,
        display: &mut D,
    ) {
        // Inputs first so their events land behind anything already queued.
        self.button_a.poll(now_ms, &mut self.queue);
        self.button_b.poll(now_ms, &mut self.queue);
        self.motion.poll(now_ms, &mut self.queue);

        // Timing deadlines.
        self.alarm.poll(now_ms, &mut self.queue);
        self.buzzer.poll(now_ms);

        // At most one event per tick keeps worst-case latency flat.
        if let Some(event) = self.queue.pop() {
            self.process_event(event, now_ms, display);
        }

        if let Some(action) = self.pending_action.take() {
            self.execute_action(action, now_ms);
        }

        self.service_hub_flags(now_ms, hub, display);
    }

    fn process_event<D: DisplayPort>(
        &mut self,
        event: DeviceEvent,
        now_ms: u64,
        display: &mut D,
    ) {
        match event.source {
            EventSource::ButtonA => {
                self.menu.move_next();
                display.write_line(0, self.menu.current_label());
            }
            EventSource::ButtonB => {
                self.pending_action = self.menu.current_action();
            }
            EventSource::Motion => {
                self.state_change_local = true;
                if let StateSnapshot::Motion(m) = event.state {
                    if m.motion_detected && self.alarm.state().armed {
                        info!("controller: motion tripped the armed alarm");
                        self.alarm.set_trigger(
                            true,
                            u64::from(self.config.motion_trigger_window_ms),
                            now_ms,
                            &mut self.queue,
                        );
                    }
                }
            }
            EventSource::Alarm => {
                self.state_change_local = true;
                if let StateSnapshot::Alarm(a) = event.state {
                    if a.triggered {
                        if a.mode != AlarmMode::Sensor {
                            self.buzzer.start_melody(
                                u64::from(self.config.melody_start_delay_ms),
                                now_ms,
                            );
                        }
                        if a.mode != AlarmMode::Local {
                            // Demote so one trigger reports once; the hub
                            // fans it out from there.
                            self.alarm_report_pending = true;
                            self.alarm.set_mode(AlarmMode::Local);
                        }
                    } else if a.mode != AlarmMode::Sensor {
                        self.buzzer.stop_melody(now_ms);
                    }
                }
            }
            EventSource::Buzzer | EventSource::Fan | EventSource::Led => {
                self.state_change_local = true;
            }
        }
    }

    fn execute_action(&mut self, action: MenuAction, now_ms: u64) {
        info!("controller: executing {action:?}");
        match action {
            MenuAction::AlarmDisarm => {
                self.alarm.disarm(now_ms);
                self.buzzer.stop_melody(now_ms);
            }
            MenuAction::AlarmArmGlobal => self.alarm.arm(AlarmMode::Global, now_ms),
            MenuAction::AlarmArmLocal => self.alarm.arm(AlarmMode::Local, now_ms),
            MenuAction::BuzzerPlay => self
                .buzzer
                .start_melody(u64::from(self.config.melody_start_delay_ms), now_ms),
            MenuAction::BuzzerStop => self.buzzer.stop_melody(now_ms),
            MenuAction::FanOnClockwise => self.fan.turn_on(true, now_ms, &mut self.queue),
            MenuAction::FanOnCounterClockwise => self.fan.turn_on(false, now_ms, &mut self.queue),
            MenuAction::FanOff => self.fan.turn_off(now_ms, &mut self.queue),
            MenuAction::LedOn => self.led.turn_on(now_ms, &mut self.queue),
            MenuAction::LedOff => self.led.turn_off(now_ms, &mut self.queue),
            MenuAction::Reset => {
                self.reset_requested = true;
            }
        }
        self.state_change_local = true;
    }

    /// Hub traffic, at most one call per flag per tick, in a fixed order:
    /// keepalive, remote pull, alarm report, local push.  A 205 keepalive
    /// raises the remote flag and is therefore pulled within the same tick.
    fn service_hub_flags<T: HttpTransport, D: DisplayPort>(
        &mut self,
        now_ms: u64,
        hub: &mut HubClient<T>,
        display: &mut D,
    ) {
        if self.keepalive_due {
            self.keepalive_due = false;
            match hub.keepalive() {
                Ok(KeepaliveOutcome::Ok) => {}
                Ok(KeepaliveOutcome::ActivateAlarm) => {
                    info!("controller: hub requested alarm activation");
                    self.alarm.set_trigger(
                        true,
                        u64::from(self.config.remote_trigger_window_ms),
                        now_ms,
                        &mut self.queue,
                    );
                }
                Ok(KeepaliveOutcome::StateAvailable) => {
                    self.state_change_remote = true;
                }
                Err(e) => {
                    warn!("controller: keepalive failed: {e}");
                    display.write_line(1, "HUB SYNC ERR");
                }
            }
        }

        if self.state_change_remote {
            self.state_change_remote = false;
            match hub.pull_state() {
                Ok(desired) => self.reconcile_remote(desired, now_ms, display),
                Err(e) => {
                    warn!("controller: state pull failed: {e}");
                    display.write_line(1, "HUB SYNC ERR");
                }
            }
        }

        if self.alarm_report_pending {
            self.alarm_report_pending = false;
            if let Err(e) = hub.report_alarm() {
                warn!("controller: alarm report failed: {e}");
                display.write_line(1, "HUB SYNC ERR");
            }
        }

        if self.state_change_local {
            self.state_change_local = false;
            let state = self.house_state();
            if let Err(e) = hub.push_state(&state) {
                warn!("controller: state push failed: {e}");
                display.write_line(1, "HUB SYNC ERR");
            }
        }
    }

    /// Apply the hub's desired state, touching only actuators that differ.
    /// Actuator methods publish their own events, so the resulting local
    /// push confirms the new state back to the hub.
    fn reconcile_remote<D: DisplayPort>(
        &mut self,
        desired: HouseStateWire,
        now_ms: u64,
        display: &mut D,
    ) {
        if desired.buzzer.active != self.buzzer.state().active {
            if desired.buzzer.active {
                self.buzzer
                    .start_melody(u64::from(self.config.melody_start_delay_ms), now_ms);
            } else {
                self.buzzer.stop_melody(now_ms);
            }
            self.state_change_local = true;
        }

        let fan = *self.fan.state();
        if desired.fan.active != fan.active
            || (desired.fan.active && desired.fan.clockwise != fan.clockwise)
        {
            if desired.fan.active {
                if fan.active {
                    // Direction change requires a stop first; turn_on is
                    // idempotent while spinning.
                    self.fan.turn_off(now_ms, &mut self.queue);
                }
                self.fan
                    .turn_on(desired.fan.clockwise, now_ms, &mut self.queue);
            } else {
                self.fan.turn_off(now_ms, &mut self.queue);
            }
        }

        if desired.led.active != self.led.state().active {
            if desired.led.active {
                self.led.turn_on(now_ms, &mut self.queue);
            } else {
                self.led.turn_off(now_ms, &mut self.queue);
            }
        }

        if desired.wall_msg != self.wall_msg {
            self.wall_msg = desired.wall_msg;
            display.write_line(1, &self.wall_msg);
            self.state_change_local = true;
        }
    }

    /// Quiesce every actuator and release ISR latches before shutdown.
    pub fn finalize(&mut self, now_ms: u64) {
        info!("controller: finalizing");
        self.buzzer.stop_melody(now_ms);
        self.fan.turn_off(now_ms, &mut self.queue);
        self.led.turn_off(now_ms, &mut self.queue);
        self.button_a.finalize();
        self.button_b.finalize();
        self.motion.finalize();
        self.alarm.finalize();
        self.buzzer.finalize();
        self.fan.finalize();
        self.led.finalize();
    }
}
