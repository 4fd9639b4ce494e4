//! # Help Text
//!
//! Command reference displayed via the `.help` command.

pub const MAIN: &str = concat!(
    "**🤖 LevelUp Help**\n",
    "Use: .command _args_ (wrap multi-word args in \"quotes\")\n",
    "\n",
    "**💪 Fitness**\n",
    "* fitness_form: Log a workout step by step\n",
    "* log_fitness [pushups] [situps] [pullups] [km]\n",
    "* fitness_stats [@user]\n",
    "* cancel: Abort the open form\n",
    "\n",
    "**🎯 Goals**\n",
    "* set_goal [name] [DD-MM-YYYY] [priority]\n",
    "* update_goal [name] [progress|deadline|priority] [value]\n",
    "* delete_goal [name]\n",
    "* view_goals\n",
    "* view_completed_goals\n",
    "\n",
    "**⏱️ Time**\n",
    "* start_timer [task] / check_timer / end_timer\n",
    "* set_schedule [task] [HH:MM] [weekly|daily]\n",
    "* view_schedule\n",
    "* delete_schedule [task] [HH:MM]\n",
    "* set_reminder [text] [HH:MM]\n",
    "* pomodoro\n",
    "* daily_goal: Claim today's bonus\n",
    "* view_productivity [day|week|month|year]\n",
    "* timex\n",
    "\n",
    "**🎲 Fun**\n",
    "* quote\n",
    "* meme / jjk / one / slayer\n",
    "* hello\n"
);
